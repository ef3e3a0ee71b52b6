//! # Taxonomía de Errores y Señales
//! src/error.rs
//!
//! Este módulo separa los tres resultados "anormales" que puede producir
//! el framework, porque cada uno se trata distinto:
//!
//! - `ConfigError`: error de configuración (setup). Fatal, nunca se
//!   convierte en una respuesta HTTP.
//! - `HttpSignal`: resultado esperado de un handler (error HTTP con
//!   status, o señal de redirect). No es un fallo del servidor.
//! - `DispatchError`: lo que viaja por la cadena de despacho — o una
//!   señal esperada, o un fallo no manejado (fault) que termina en 500.

use crate::http::StatusCode;
use std::backtrace::Backtrace;

// ==================== ConfigError ====================

/// Errores de configuración, previos a servir requests
///
/// Ocurren al registrar rutas o interceptores. Son fatales en tiempo de
/// setup: el framework no los atrapa ni los convierte en respuestas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Se intentó registrar algo cuando la aplicación ya está sirviendo
    AlreadyServing,

    /// Pattern de interceptor inválido (solo se admite `prefix*` o `*suffix`)
    InvalidInterceptorPattern(String),

    /// Un path pattern repite el nombre de una variable (ej: `/a/:x/b/:x`)
    DuplicateParam(String),

    /// El path pattern no pudo compilarse a un matcher
    InvalidPathPattern(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::AlreadyServing => {
                write!(f, "Cannot modify the application while it is serving")
            }
            ConfigError::InvalidInterceptorPattern(p) => {
                write!(f, "Invalid interceptor pattern: {:?}", p)
            }
            ConfigError::DuplicateParam(name) => {
                write!(f, "Duplicate parameter name in path pattern: {:?}", name)
            }
            ConfigError::InvalidPathPattern(detail) => {
                write!(f, "Invalid path pattern: {}", detail)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ==================== HttpSignal ====================

/// Señal HTTP esperada: error con status, o redirect
///
/// Los handlers e interceptores la lanzan con `return Err(señal.into())`.
/// Atraviesa la cadena sin modificarse y el motor de despacho la mapea
/// directamente a la respuesta. No se loggea como fallo.
///
/// NOTA: deliberadamente NO implementa `std::error::Error`, porque es una
/// señal de control (sobre todo el redirect), y porque eso permite el
/// `From` blanket que convierte cualquier error real en un Fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpSignal {
    /// Error HTTP esperado: responde con la status line y un body HTML mínimo
    Status {
        code: StatusCode,
        /// Headers extra que acompañan la respuesta (en orden)
        headers: Vec<(String, String)>,
    },

    /// Señal de redirect: responde 301/302/303 con header `Location` y sin body
    Redirect {
        code: StatusCode,
        location: String,
        headers: Vec<(String, String)>,
    },
}

impl HttpSignal {
    /// Señal de error con el status indicado
    pub fn status(code: StatusCode) -> Self {
        HttpSignal::Status {
            code,
            headers: Vec::new(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request() -> Self {
        Self::status(StatusCode::BadRequest)
    }

    /// 401 Unauthorized
    pub fn unauthorized() -> Self {
        Self::status(StatusCode::Unauthorized)
    }

    /// 403 Forbidden
    pub fn forbidden() -> Self {
        Self::status(StatusCode::Forbidden)
    }

    /// 404 Not Found
    pub fn not_found() -> Self {
        Self::status(StatusCode::NotFound)
    }

    /// 409 Conflict
    pub fn conflict() -> Self {
        Self::status(StatusCode::Conflict)
    }

    /// 500 Internal Server Error (como señal esperada, no como fault)
    pub fn internal_error() -> Self {
        Self::status(StatusCode::InternalServerError)
    }

    /// Redirect permanente (301) hacia `location`
    pub fn redirect(location: &str) -> Self {
        Self::redirect_with(StatusCode::MovedPermanently, location)
    }

    /// Redirect temporal (302) hacia `location`
    pub fn found(location: &str) -> Self {
        Self::redirect_with(StatusCode::Found, location)
    }

    /// Redirect 303 See Other hacia `location` (típico tras un POST)
    pub fn see_other(location: &str) -> Self {
        Self::redirect_with(StatusCode::SeeOther, location)
    }

    fn redirect_with(code: StatusCode, location: &str) -> Self {
        // Invariante: code siempre viene de los tres constructores 3xx
        HttpSignal::Redirect {
            code,
            location: location.to_string(),
            headers: Vec::new(),
        }
    }

    /// Agrega un header extra a la señal (se anexa a la respuesta final)
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::error::HttpSignal;
    ///
    /// let signal = HttpSignal::unauthorized()
    ///     .with_header("WWW-Authenticate", "Basic realm=\"admin\"");
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let headers = match &mut self {
            HttpSignal::Status { headers, .. } => headers,
            HttpSignal::Redirect { headers, .. } => headers,
        };
        headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Código de estado de la señal
    pub fn code(&self) -> StatusCode {
        match self {
            HttpSignal::Status { code, .. } => *code,
            HttpSignal::Redirect { code, .. } => *code,
        }
    }

    /// Headers extra de la señal, en orden de inserción
    pub fn headers(&self) -> &[(String, String)] {
        match self {
            HttpSignal::Status { headers, .. } => headers,
            HttpSignal::Redirect { headers, .. } => headers,
        }
    }
}

impl std::fmt::Display for HttpSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpSignal::Status { code, .. } => write!(f, "{}", code),
            HttpSignal::Redirect { code, location, .. } => {
                write!(f, "{}, {}", code, location)
            }
        }
    }
}

// ==================== DispatchError ====================

/// Resultado anormal de la cadena de despacho
///
/// O bien una señal esperada (pasa intacta hasta el motor), o bien un
/// fault: cualquier otro error levantado por un handler o interceptor.
/// Los faults siempre se loggean con detalle del lado del servidor;
/// el detalle visible al cliente depende del modo debug.
#[derive(Debug)]
pub enum DispatchError {
    /// Señal esperada (StatusError / RedirectSignal)
    Signal(HttpSignal),

    /// Fallo no manejado: termina en 500
    Fault {
        source: Box<dyn std::error::Error + Send + Sync>,
        backtrace: Backtrace,
    },
}

impl DispatchError {
    /// Construye un fault a partir de cualquier error, capturando backtrace
    pub fn fault<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DispatchError::Fault {
            source: source.into(),
            backtrace: Backtrace::force_capture(),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Signal(signal) => write!(f, "{}", signal),
            DispatchError::Fault { source, .. } => write!(f, "{}", source),
        }
    }
}

impl From<HttpSignal> for DispatchError {
    fn from(signal: HttpSignal) -> Self {
        DispatchError::Signal(signal)
    }
}

/// Cualquier error real se convierte en Fault (habilita `?` en handlers)
impl<E> From<E> for DispatchError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(source: E) -> Self {
        DispatchError::fault(source)
    }
}
