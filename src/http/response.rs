//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo implementa la "respuesta en progreso" que el framework
//! construye durante el despacho y la serialización final hacia el socket.
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>hola</h1>
//! ```
//!
//! ## Diferencias con un response "de un solo uso"
//!
//! - Los headers son una lista ORDENADA que admite duplicados (varios
//!   `Set-Cookie` en la misma respuesta, por ejemplo).
//! - El body puede ser bytes fijos o una secuencia perezosa de bloques
//!   (streaming de archivos estáticos).

use super::StatusCode;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Tamaño de bloque para bodies en streaming
pub const CHUNK_SIZE: usize = 8192;

/// Secuencia perezosa y finita de bloques de un archivo
///
/// Cada `next()` hace una lectura síncrona de hasta [`CHUNK_SIZE`] bytes.
/// No es reiniciable: un nuevo request vuelve a abrir el archivo.
#[derive(Debug)]
pub struct ChunkedFile {
    file: File,
}

impl ChunkedFile {
    /// Abre el archivo para streaming por bloques
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl Iterator for ChunkedFile {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = vec![0u8; CHUNK_SIZE];
        match self.file.read(&mut block) {
            Ok(0) => None,
            Ok(n) => {
                block.truncate(n);
                Some(Ok(block))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Body de la respuesta: bytes fijos o bloques perezosos
#[derive(Debug)]
pub enum Body {
    /// Secuencia fija de bytes (el caso común)
    Fixed(Vec<u8>),

    /// Bloques leídos bajo demanda (archivos estáticos)
    Stream(ChunkedFile),
}

/// Cookie saliente, serializada como header `Set-Cookie`
///
/// # Ejemplo
/// ```
/// use miniweb::http::Cookie;
///
/// let cookie = Cookie::new("session", "abc123")
///     .with_max_age(3600)
///     .with_path("/app");
/// assert!(cookie.serialize().contains("Max-Age=3600"));
/// ```
#[derive(Debug, Clone)]
pub struct Cookie {
    name: String,
    value: String,
    max_age: Option<u64>,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    /// Crea una cookie con path `/` y HttpOnly activado
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            max_age: None,
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: true,
        }
    }

    /// Vida máxima en segundos
    pub fn with_max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Path de la cookie (por defecto `/`)
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Dominio de la cookie
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    /// Marca la cookie como Secure (solo HTTPS)
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Controla el atributo HttpOnly (activado por defecto)
    pub fn http_only(mut self, enabled: bool) -> Self {
        self.http_only = enabled;
        self
    }

    /// Nombre de la cookie
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializa la cookie al formato del header `Set-Cookie`
    pub fn serialize(&self) -> String {
        let mut parts = vec![format!("{}={}", self.name, self.value)];
        if let Some(max_age) = self.max_age {
            parts.push(format!("Max-Age={}", max_age));
        }
        parts.push(format!("Path={}", self.path));
        if let Some(domain) = &self.domain {
            parts.push(format!("Domain={}", domain));
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        parts.join("; ")
    }
}

/// Representa una respuesta HTTP completa (o en progreso)
#[derive(Debug)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP en orden de inserción (se admiten duplicados)
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Body,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto, la respuesta no tiene headers ni body.
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Fixed(Vec::new()),
        }
    }

    /// Agrega un header a la respuesta (versión builder)
    ///
    /// Si ya existe un header con ese nombre, se reemplaza el primero.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Reemplaza (o agrega) un header
    ///
    /// La comparación de nombres es case-insensitive, como manda HTTP.
    pub fn set_header(&mut self, name: &str, value: &str) {
        for (n, v) in &mut self.headers {
            if n.eq_ignore_ascii_case(name) {
                *v = value.to_string();
                return;
            }
        }
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Agrega un header SIN reemplazar ocurrencias previas
    ///
    /// Necesario para headers repetibles como `Set-Cookie`.
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Elimina todas las ocurrencias de un header
    pub fn unset_header(&mut self, name: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Obtiene el valor de la primera ocurrencia de un header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Establece el cuerpo de la respuesta desde un string (builder)
    pub fn with_body(mut self, body: &str) -> Self {
        self.set_body(body.as_bytes().to_vec());
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes (builder)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.set_body(body);
        self
    }

    /// Establece el cuerpo como bytes fijos
    ///
    /// `Content-Length` se calcula al serializar, no acá, porque el body
    /// puede reemplazarse varias veces durante el despacho.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Body::Fixed(body);
    }

    /// Establece el cuerpo como streaming de bloques
    pub fn set_body_stream(&mut self, chunks: ChunkedFile) {
        self.body = Body::Stream(chunks);
    }

    /// Vacía el cuerpo (redirects responden sin body)
    pub fn clear_body(&mut self) {
        self.body = Body::Fixed(Vec::new());
    }

    /// Crea una respuesta JSON exitosa (200 OK)
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::http::Response;
    ///
    /// let response = Response::json(r#"{"status": "ok"}"#);
    /// ```
    pub fn json(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Crea una respuesta de error con body HTML mínimo nombrando el status
    ///
    /// Formato: `<html><body><h1>404 Not Found</h1></body></html>`
    pub fn error(status: StatusCode) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body_bytes(error_body(status))
    }

    /// Agrega una cookie como header `Set-Cookie` (se anexa, no reemplaza)
    pub fn set_cookie(&mut self, cookie: Cookie) {
        self.add_header("Set-Cookie", &cookie.serialize());
    }

    /// Borra una cookie del cliente (Max-Age=0)
    pub fn delete_cookie(&mut self, name: &str) {
        self.set_cookie(Cookie::new(name, "__deleted__").with_max_age(0));
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Cambia el código de estado
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Obtiene una referencia a los headers, en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene el body si es de bytes fijos
    pub fn body(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Fixed(bytes) => Some(bytes),
            Body::Stream(_) => None,
        }
    }

    /// Indica si el body es streaming
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Stream(_))
    }

    // Serializa status line + headers (incluyendo Content-Length si aplica)
    fn head_bytes(&self, content_length: Option<usize>) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line
        let status_line = format!("HTTP/1.0 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers en orden de inserción
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }
        if let Some(len) = content_length {
            result.extend_from_slice(format!("Content-Length: {}\r\n", len).as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");
        result
    }

    /// Convierte la respuesta COMPLETA a bytes
    ///
    /// Para bodies en streaming drena los bloques a memoria; el server
    /// usa `write_to`, que sí escribe bloque a bloque.
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok).with_body("Test");
    /// let bytes = response.to_bytes();
    /// assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
    /// ```
    pub fn to_bytes(self) -> Vec<u8> {
        // El head se serializa antes de desarmar el body, que consume self
        let mut result = self.head_bytes(self.content_length());

        match self.body {
            Body::Fixed(bytes) => {
                result.extend_from_slice(&bytes);
            }
            Body::Stream(chunks) => {
                for block in chunks.flatten() {
                    result.extend_from_slice(&block);
                }
            }
        }
        result
    }

    /// Escribe la respuesta en el stream, bloque a bloque si es streaming
    pub fn write_to<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.head_bytes(self.content_length()))?;

        match self.body {
            Body::Fixed(bytes) => {
                writer.write_all(&bytes)?;
            }
            Body::Stream(chunks) => {
                for block in chunks {
                    writer.write_all(&block?)?;
                }
            }
        }
        writer.flush()
    }

    // Content-Length solo para bodies fijos: en streaming el cierre de la
    // conexión delimita el body (HTTP/1.0)
    fn content_length(&self) -> Option<usize> {
        match &self.body {
            Body::Fixed(bytes) => Some(bytes.len()),
            Body::Stream(_) => None,
        }
    }
}

/// Body HTML mínimo que nombra un status (lo usa también el despacho)
pub(crate) fn error_body(status: StatusCode) -> Vec<u8> {
    format!("<html><body><h1>{}</h1></body></html>", status).into_bytes()
}

impl Default for Response {
    /// Respuesta en progreso inicial: 200 con Content-Type HTML
    fn default() -> Self {
        Self::new(StatusCode::Ok).with_header("Content-Type", "text/html; charset=utf-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.headers().is_empty());
        assert_eq!(response.body(), Some(&[][..]));
    }

    #[test]
    fn test_default_response_in_progress() {
        let response = Response::default();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.header("content-type"),
            Some("text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_set_header_replaces() {
        let mut response = Response::new(StatusCode::Ok);
        response.set_header("Content-Type", "text/plain");
        response.set_header("content-type", "application/json");

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn test_add_header_allows_duplicates() {
        let mut response = Response::new(StatusCode::Ok);
        response.add_header("Set-Cookie", "a=1");
        response.add_header("Set-Cookie", "b=2");

        let cookies: Vec<_> = response
            .headers()
            .iter()
            .filter(|(n, _)| n == "Set-Cookie")
            .collect();
        assert_eq!(cookies.len(), 2);
        // El orden de inserción se preserva
        assert_eq!(cookies[0].1, "a=1");
        assert_eq!(cookies[1].1, "b=2");
    }

    #[test]
    fn test_unset_header() {
        let mut response = Response::new(StatusCode::Ok);
        response.add_header("X-Trace", "1");
        response.add_header("X-Trace", "2");
        response.unset_header("x-trace");
        assert_eq!(response.header("X-Trace"), None);
    }

    #[test]
    fn test_with_body() {
        let response = Response::new(StatusCode::Ok).with_body("Hello World");
        assert_eq!(response.body(), Some(&b"Hello World"[..]));
    }

    #[test]
    fn test_json_response() {
        let response = Response::json(r#"{"status": "ok"}"#);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body(), Some(&br#"{"status": "ok"}"#[..]));
    }

    #[test]
    fn test_error_response_names_status() {
        let response = Response::error(StatusCode::NotFound);

        assert_eq!(response.status(), StatusCode::NotFound);
        let body = String::from_utf8(response.body().unwrap().to_vec()).unwrap();
        assert!(body.contains("<h1>404 Not Found</h1>"));
    }

    #[test]
    fn test_to_bytes() {
        let response = Response::new(StatusCode::Ok)
            .with_header("Content-Type", "text/plain")
            .with_body("Test");

        let bytes = response.to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.ends_with("\r\n\r\nTest"));
    }

    #[test]
    fn test_empty_body_response() {
        let response = Response::new(StatusCode::NoContent);
        let bytes = response.to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        // Body vacío: Content-Length 0 y nada después de la línea vacía
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_cookie_serialize() {
        let cookie = Cookie::new("session", "abc")
            .with_max_age(60)
            .with_path("/app")
            .with_domain("example.com")
            .secure();

        let line = cookie.serialize();
        assert!(line.starts_with("session=abc"));
        assert!(line.contains("Max-Age=60"));
        assert!(line.contains("Path=/app"));
        assert!(line.contains("Domain=example.com"));
        assert!(line.contains("Secure"));
        assert!(line.contains("HttpOnly"));
    }

    #[test]
    fn test_set_cookie_appends_headers() {
        let mut response = Response::new(StatusCode::Ok);
        response.set_cookie(Cookie::new("a", "1"));
        response.set_cookie(Cookie::new("b", "2"));
        response.delete_cookie("a");

        let cookies: Vec<_> = response
            .headers()
            .iter()
            .filter(|(n, _)| n == "Set-Cookie")
            .collect();
        assert_eq!(cookies.len(), 3);
        assert!(cookies[2].1.contains("Max-Age=0"));
    }

    #[test]
    fn test_chunked_file_streaming() {
        // Archivo temporal con más de un bloque
        let dir = std::env::temp_dir();
        let path = dir.join("miniweb_chunked_test.bin");
        let data = vec![7u8; CHUNK_SIZE + 100];
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&data)
            .unwrap();

        let chunks: Vec<Vec<u8>> = ChunkedFile::open(&path)
            .unwrap()
            .map(|b| b.unwrap())
            .collect();
        std::fs::remove_file(&path).ok();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), CHUNK_SIZE);
        assert_eq!(chunks[1].len(), 100);
    }

    #[test]
    fn test_to_bytes_stream_body() {
        let dir = std::env::temp_dir();
        let path = dir.join("miniweb_to_bytes_stream_test.bin");
        let data = vec![3u8; CHUNK_SIZE + 50];
        std::fs::write(&path, &data).unwrap();

        let mut response = Response::new(StatusCode::Ok);
        response.set_body_stream(ChunkedFile::open(&path).unwrap());

        let bytes = response.to_bytes();
        std::fs::remove_file(&path).ok();

        assert!(bytes.starts_with(b"HTTP/1.0 200 OK\r\n"));
        // Head + línea vacía + todos los bloques drenados
        assert!(bytes.ends_with(&[3u8; 50][..]));
        assert_eq!(bytes.len(), b"HTTP/1.0 200 OK\r\n\r\n".len() + data.len());
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("Content-Length"));
    }

    #[test]
    fn test_write_to_stream_body() {
        let dir = std::env::temp_dir();
        let path = dir.join("miniweb_write_to_test.txt");
        std::fs::write(&path, b"contenido estatico").unwrap();

        let mut response = Response::new(StatusCode::Ok);
        response.set_body_stream(ChunkedFile::open(&path).unwrap());
        assert!(response.is_streaming());

        let mut out = Vec::new();
        response.write_to(&mut out).unwrap();
        std::fs::remove_file(&path).ok();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.ends_with("contenido estatico"));
        // Streaming: el cierre de conexión delimita, no hay Content-Length
        assert!(!text.contains("Content-Length"));
    }
}
