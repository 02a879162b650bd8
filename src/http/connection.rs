use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::dispatcher::Dispatcher;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::{Method, RawRequest};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

pub struct Connection {
    stream: TcpStream,
    buffer: Vec<u8>,
    state: ConnectionState,
    dispatcher: Arc<Dispatcher>,
    max_body: usize,
}

pub enum ConnectionState {
    Reading,
    Processing(RawRequest),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>, max_body: usize) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            dispatcher,
            max_body,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await {
                    Ok(Some(req)) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    Ok(None) => {
                        self.state = ConnectionState::Closed;
                    }
                    Err(e) => {
                        tracing::warn!(error = ?e, "Rejecting malformed request");
                        let response = match e {
                            ParseError::BodyTooLarge => Response::payload_too_large(),
                            ParseError::HeadersTooLarge => Response::header_fields_too_large(),
                            _ => Response::bad_request(),
                        };
                        let writer = ResponseWriter::new(&response, false);
                        self.state = ConnectionState::Writing(writer, false);
                    }
                },

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = match self.dispatcher.dispatch(req).await {
                        Ok(response) => (response, req.keep_alive()),
                        Err(e) => {
                            // Fatal for this request; the connection is not reused.
                            tracing::error!(
                                method = %req.method,
                                path = %req.path,
                                error = %e,
                                "Request failed"
                            );
                            (Response::internal_error(), false)
                        }
                    };

                    let writer = ResponseWriter::new(&response, req.method == Method::HEAD);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one full request is buffered.
    ///
    /// `Ok(None)` means the client closed the connection cleanly. I/O errors
    /// while reading are treated the same way.
    pub async fn read_request(&mut self) -> Result<Option<RawRequest>, ParseError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer, self.max_body) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e),
            }

            let mut temp = [0u8; 4096];
            let n = match self.stream.read(&mut temp).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!(error = %e, "Read failed, closing connection");
                    return Ok(None);
                }
            };

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
