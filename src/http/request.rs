//! # Parsing de Requests HTTP
//! src/http/request.rs
//!
//! Parser HTTP/1.0-1.1 desde cero para la frontera de entrada del
//! framework: el transporte entrega un request ya delimitado y este
//! módulo lo convierte en la descripción que consume el despacho
//! (método + path decodificado + query + headers + body).
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /path?param1=value1&param2=value2 HTTP/1.0\r\n
//! Host: localhost:8080\r\n
//! Cookie: session=abc\r\n
//! \r\n
//! ```

use super::form::{percent_decode, FormData};
use std::cell::OnceCell;
use std::collections::HashMap;

/// Métodos HTTP soportados por el framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// PUT - Reemplazar un recurso
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es soportado; el transporte responde
    /// 400 Bad Request en ese caso.
    pub fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }

    /// Índice estable del método (para las tablas de rutas por método)
    pub(crate) fn index(&self) -> usize {
        match self {
            Method::GET => 0,
            Method::POST => 1,
            Method::PUT => 2,
            Method::DELETE => 3,
        }
    }

    /// Cantidad de métodos soportados
    pub(crate) const COUNT: usize = 4;
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request incompleto o truncado
    IncompleteRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta (debe ser HTTP/1.0 o HTTP/1.1)
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path de la petición, ya percent-decodificado (ej: "/users/7")
    path: String,

    /// Query string cruda (ej: "num=10&fast=true")
    query_string: String,

    /// Query parameters parseados y decodificados
    query_params: HashMap<String, String>,

    /// Headers HTTP
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body crudo del request (vacío en GET)
    body: Vec<u8>,

    /// Dirección del cliente (metadata de conexión)
    remote_addr: Option<String>,

    /// Cache del formulario parseado (se calcula a demanda)
    form: OnceCell<FormData>,
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use miniweb::http::Request;
    ///
    /// let raw = b"GET /saludo?nombre=ana HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/saludo");
    /// assert_eq!(request.query_param("nombre"), Some("ana"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Separar head (texto) de body (bytes crudos) por la línea vacía
        let head_end = find_head_end(buffer);
        let head = std::str::from_utf8(&buffer[..head_end])
            .map_err(|_| ParseError::InvalidRequestLine)?;

        if head.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head.split("\r\n");
        let request_line = lines.next().ok_or(ParseError::IncompleteRequest)?;

        // 1. Parsear la request line
        let (method, path, query_string, query_params, version) =
            Self::parse_request_line(request_line)?;

        // 2. Parsear headers (resto de líneas del head)
        let headers = Self::parse_headers(lines)?;

        // 3. Body: lo que sigue a la línea vacía
        let body = if head_end + 4 <= buffer.len() {
            buffer[head_end + 4..].to_vec()
        } else {
            Vec::new()
        };

        Ok(Request {
            method,
            path,
            query_string,
            query_params,
            headers,
            version,
            body,
            remote_addr: None,
            form: OnceCell::new(),
        })
    }

    /// Parsea la request line: `GET /path?query HTTP/1.0`
    #[allow(clippy::type_complexity)]
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, String, String, HashMap<String, String>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let method = Method::from_str(parts[0])?;
        let (path, query_string, query_params) = Self::parse_path_and_query(parts[1]);

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query_string, query_params, version))
    }

    /// Separa path de query string y decodifica ambos
    ///
    /// Ejemplo: "/buscar?texto=hola%20mundo"
    /// Retorna: ("/buscar", "texto=hola%20mundo", {"texto": "hola mundo"})
    fn parse_path_and_query(target: &str) -> (String, String, HashMap<String, String>) {
        if let Some(query_start) = target.find('?') {
            let path = percent_decode(&target[..query_start]);
            let query_string = target[query_start + 1..].to_string();
            let query_params = Self::parse_query_string(&query_string);
            (path, query_string, query_params)
        } else {
            (percent_decode(target), String::new(), HashMap::new())
        }
    }

    /// Parsea una query string en un HashMap (keys repetidas: gana la última)
    fn parse_query_string(query: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();

        for param in query.split('&') {
            if param.is_empty() {
                continue;
            }

            if let Some(eq_pos) = param.find('=') {
                let key = percent_decode(&param[..eq_pos]);
                let value = percent_decode(&param[eq_pos + 1..]);
                params.insert(key, value);
            } else {
                params.insert(percent_decode(param), String::new());
            }
        }

        params
    }

    /// Parsea los headers HTTP (formato "Name: Value")
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_string();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            } else {
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request (ya percent-decodificado)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la query string cruda
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Obtiene todos los query parameters
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body crudo del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Dirección remota del cliente ("0.0.0.0" si no se conoce)
    pub fn remote_addr(&self) -> &str {
        self.remote_addr.as_deref().unwrap_or("0.0.0.0")
    }

    /// Registra la dirección remota (la setea el transporte)
    pub fn set_remote_addr(&mut self, addr: &str) {
        self.remote_addr = Some(addr.to_string());
    }

    // === Cookies ===

    /// Parsea el header `Cookie` en un mapa nombre -> valor
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::http::Request;
    ///
    /// let raw = b"GET / HTTP/1.0\r\nCookie: session=abc; theme=dark\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    /// assert_eq!(request.cookie("session"), Some("abc".to_string()));
    /// assert_eq!(request.cookie("theme"), Some("dark".to_string()));
    /// ```
    pub fn cookies(&self) -> HashMap<String, String> {
        let mut cookies = HashMap::new();
        if let Some(raw) = self.header("Cookie") {
            for piece in raw.split(';') {
                if let Some(eq_pos) = piece.find('=') {
                    let name = piece[..eq_pos].trim().to_string();
                    let value = percent_decode(piece[eq_pos + 1..].trim());
                    if !name.is_empty() {
                        cookies.insert(name, value);
                    }
                }
            }
        }
        cookies
    }

    /// Obtiene una cookie específica
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies().remove(name)
    }

    // === Formulario (colaborador de body) ===

    /// Campos de formulario del request
    ///
    /// Para POST/PUT con body urlencoded se parsea el body; para el resto
    /// se usan los parámetros del query string. El resultado se cachea.
    pub fn form(&self) -> &FormData {
        self.form.get_or_init(|| {
            let is_urlencoded = self
                .header("Content-Type")
                .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
                .unwrap_or(false);

            if matches!(self.method, Method::POST | Method::PUT) && is_urlencoded {
                let body = String::from_utf8_lossy(&self.body);
                FormData::parse_urlencoded(&body)
            } else {
                FormData::parse_urlencoded(&self.query_string)
            }
        })
    }

    /// Primer valor de un campo de formulario
    pub fn param(&self, key: &str) -> Option<&str> {
        self.form().get(key)
    }

    /// Todos los valores de un campo de formulario, en orden
    pub fn params(&self, key: &str) -> Vec<&str> {
        self.form().get_all(key)
    }
}

/// Encuentra el fin del head (posición de la secuencia `\r\n\r\n`)
fn find_head_end(buffer: &[u8]) -> usize {
    buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .unwrap_or(buffer.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.query_params().is_empty());
    }

    #[test]
    fn test_parse_all_methods() {
        for (raw, method) in [
            (&b"GET / HTTP/1.0\r\n\r\n"[..], Method::GET),
            (&b"POST / HTTP/1.0\r\n\r\n"[..], Method::POST),
            (&b"PUT / HTTP/1.0\r\n\r\n"[..], Method::PUT),
            (&b"DELETE / HTTP/1.0\r\n\r\n"[..], Method::DELETE),
        ] {
            assert_eq!(Request::parse(raw).unwrap().method(), method);
        }
    }

    #[test]
    fn test_parse_with_query_params() {
        let raw = b"GET /buscar?texto=hola&limit=5 HTTP/1.1\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/buscar");
        assert_eq!(request.query_string(), "texto=hola&limit=5");
        assert_eq!(request.query_param("texto"), Some("hola"));
        assert_eq!(request.query_param("limit"), Some("5"));
    }

    #[test]
    fn test_parse_percent_decoded_path() {
        let raw = b"GET /archivos/mi%20doc.txt HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.path(), "/archivos/mi doc.txt");
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"GET / HTTP/1.0\r\nHost: localhost:8080\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:8080"));
        assert_eq!(request.header("user-agent"), Some("test"));
    }

    #[test]
    fn test_parse_post_body_raw_bytes() {
        let raw = b"POST /datos HTTP/1.0\r\nContent-Type: text/plain\r\n\r\nlinea1\r\nlinea2";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body(), b"linea1\r\nlinea2");
    }

    #[test]
    fn test_unsupported_method() {
        let raw = b"PATCH / HTTP/1.0\r\n\r\n";
        let result = Request::parse(raw);
        assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / HTTP/2.0\r\n\r\n";
        let result = Request::parse(raw);
        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        let result = Request::parse(b"");
        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n";
        let result = Request::parse(raw);
        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_header() {
        let raw = b"GET / HTTP/1.0\r\nSinDosPuntos\r\n\r\n";
        let result = Request::parse(raw);
        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }

    #[test]
    fn test_remote_addr_default_and_set() {
        let mut request = Request::parse(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.remote_addr(), "0.0.0.0");
        request.set_remote_addr("127.0.0.1:5555");
        assert_eq!(request.remote_addr(), "127.0.0.1:5555");
    }

    #[test]
    fn test_cookies() {
        let raw = b"GET / HTTP/1.0\r\nCookie: a=1; b=hola%20mundo\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.cookie("a"), Some("1".to_string()));
        assert_eq!(request.cookie("b"), Some("hola mundo".to_string()));
        assert_eq!(request.cookie("c"), None);
    }

    #[test]
    fn test_form_from_post_body() {
        let raw = b"POST /login HTTP/1.0\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nuser=ana&tag=a&tag=b";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.param("user"), Some("ana"));
        assert_eq!(request.params("tag"), vec!["a", "b"]);
    }

    #[test]
    fn test_form_falls_back_to_query() {
        let raw = b"GET /buscar?q=rust HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.param("q"), Some("rust"));
    }

    #[test]
    fn test_method_index_is_stable() {
        assert_eq!(Method::GET.index(), 0);
        assert_eq!(Method::POST.index(), 1);
        assert_eq!(Method::PUT.index(), 2);
        assert_eq!(Method::DELETE.index(), 3);
        assert_eq!(Method::COUNT, 4);
    }
}
