//! # Handlers y su Resultado
//! src/handler.rs
//!
//! Un handler recibe el contexto del request (por referencia mutable) y
//! los valores capturados del path, y retorna `Result<Payload, _>`.
//!
//! `Payload` es una variante CERRADA: el motor de despacho la clasifica
//! con un match total, sin inspección dinámica de tipos. Las señales
//! (errores HTTP esperados y redirects) viajan por el lado `Err`.

use crate::context::Context;
use crate::error::DispatchError;
use crate::http::ChunkedFile;
use crate::view::Template;
use std::sync::Arc;

/// Resultado normal de un handler, clasificado por el motor de despacho
#[derive(Debug)]
pub enum Payload {
    /// Sin contenido: body vacío
    Empty,

    /// Texto que se convierte directamente en el body
    Text(String),

    /// Bytes que se convierten directamente en el body
    Bytes(Vec<u8>),

    /// Render diferido: se delega al motor de templates configurado
    View(Template),

    /// Secuencia perezosa de bloques (archivos estáticos)
    Stream(ChunkedFile),
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<Template> for Payload {
    fn from(template: Template) -> Self {
        Payload::View(template)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

/// Resultado que fluye por la cadena de despacho
pub type DispatchOutcome = Result<Payload, DispatchError>;

/// Función handler de una ruta
///
/// Recibe el contexto del request y los argumentos capturados del path
/// (vacíos para rutas estáticas), en orden de aparición.
pub type Handler = Arc<dyn Fn(&mut Context, &[String]) -> DispatchOutcome + Send + Sync>;

/// Envuelve un closure como [`Handler`]
///
/// # Ejemplo
/// ```
/// use miniweb::handler::{handler, Payload};
///
/// let h = handler(|_ctx, args| Ok(Payload::Text(format!("hola {}", args[0]))));
/// ```
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Context, &[String]) -> DispatchOutcome + Send + Sync + 'static,
{
    Arc::new(f)
}
