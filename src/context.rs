//! # Contexto por Request
//! src/context.rs
//!
//! Estado con alcance de UN request: el request parseado, la respuesta
//! en progreso y la vista de la aplicación (document root, modo debug).
//!
//! El contexto se crea con `enter` al comenzar a atender un request y se
//! destruye con `exit` al terminar, en TODOS los caminos de control
//! (retorno normal, señal, fault). No hay estado global: el contexto se
//! pasa por `&mut` a cada interceptor y handler, así nunca puede filtrarse
//! hacia otro request concurrente — el ownership lo garantiza.

use crate::http::{Request, Response};
use std::path::PathBuf;
use std::sync::Arc;

/// Vista de solo lectura de la aplicación, visible durante el request
#[derive(Debug)]
pub struct AppShared {
    /// Raíz de documentos para archivos estáticos
    pub document_root: PathBuf,

    /// Modo diagnóstico: los faults muestran detalle al cliente
    pub debug: bool,
}

/// Contexto de un request en curso
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Response,
    shared: Arc<AppShared>,
}

impl Context {
    /// Crea el contexto para un request entrante
    ///
    /// La respuesta en progreso arranca en 200 con Content-Type HTML.
    /// Debe llamarse exactamente una vez por request, antes de ejecutar
    /// cualquier interceptor o handler.
    pub fn enter(request: Request, shared: Arc<AppShared>) -> Self {
        Self {
            request,
            response: Response::default(),
            shared,
        }
    }

    /// Request parseado
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Respuesta en progreso (lectura)
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Respuesta en progreso (escritura: headers, cookies, status)
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Vista de la aplicación dueña del request
    pub fn app(&self) -> &AppShared {
        &self.shared
    }

    /// Destruye el contexto y libera la respuesta acumulada
    ///
    /// Consume `self`: después de `exit` el request y la vista de la
    /// aplicación dejan de existir, y el contexto no puede reutilizarse
    /// (lo impide el type system, no un flag en runtime).
    pub fn exit(self) -> Response {
        self.response
    }
}
