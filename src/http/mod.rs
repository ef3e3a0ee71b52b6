//! # Módulo HTTP
//!
//! Este módulo implementa las fronteras de entrada y salida del núcleo
//! de despacho, sin librerías HTTP de alto nivel:
//!
//! - Parsing de requests HTTP/1.0-1.1 (frontera de entrada)
//! - Construcción y serialización de responses (frontera de salida)
//! - Status codes
//! - Parsing de formularios urlencoded (colaborador de body)
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>hola</h1>
//! ```

pub mod form;      // Parsing de formularios (colaborador de body)
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::{Body, ChunkedFile, Cookie, Response, CHUNK_SIZE};
pub use status::StatusCode;
