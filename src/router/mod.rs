//! # Tabla de Rutas
//! src/router/mod.rs
//!
//! Mapea (método, path) a handlers. Por cada método HTTP hay dos
//! estructuras:
//!
//! - un mapa de match exacto para rutas ESTÁTICAS (sin `:name`), y
//! - una lista ordenada de rutas DINÁMICAS que se prueban en orden de
//!   registro.
//!
//! El lookup estático va primero y es O(1) respecto de la cantidad de
//! rutas dinámicas: las rutas literales son la mayoría y no deben pagar
//! el escaneo lineal. Las dinámicas se escanean en orden porque los
//! patterns pueden solaparse y el desempate definido es
//! "gana la primera registrada".

pub mod pattern;

use crate::error::ConfigError;
use crate::handler::Handler;
use crate::http::Method;
use pattern::{is_dynamic, PathPattern};
use std::collections::HashMap;
use std::sync::Arc;

/// Una ruta registrada: método + path + handler
///
/// Invariante: `is_static()` si y solo si el path no contiene segmentos
/// `:name`; en ese caso no hay matcher compilado y la ruta se resuelve
/// por igualdad exacta. Se crea una vez en tiempo de registro y es
/// inmutable después.
pub struct Route {
    method: Method,
    path: String,
    pattern: Option<PathPattern>,
    handler: Handler,
}

impl Route {
    /// Crea una ruta, compilando el pattern solo si el path es dinámico
    pub fn new(method: Method, path: &str, handler: Handler) -> Result<Self, ConfigError> {
        let pattern = if is_dynamic(path) {
            Some(PathPattern::compile(path)?)
        } else {
            None
        };
        Ok(Self {
            method,
            path: path.to_string(),
            pattern,
            handler,
        })
    }

    /// Crea una ruta dinámica de prefijo que captura el resto del path
    ///
    /// La usa el serving de archivos estáticos (`/static/...`).
    pub fn tail(method: Method, prefix: &str, handler: Handler) -> Result<Self, ConfigError> {
        Ok(Self {
            method,
            path: format!("{}*", prefix),
            pattern: Some(PathPattern::tail(prefix)?),
            handler,
        })
    }

    /// Indica si la ruta se matchea por igualdad exacta
    pub fn is_static(&self) -> bool {
        self.pattern.is_none()
    }

    /// Método HTTP de la ruta
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path (o pattern) con el que se registró
    pub fn path(&self) -> &str {
        &self.path
    }

    // Prueba el path contra el matcher compilado (solo rutas dinámicas)
    fn matches(&self, path: &str) -> Option<Vec<String>> {
        self.pattern.as_ref()?.matches(path)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_static() { "static" } else { "dynamic" };
        write!(f, "Route({},{},path={})", kind, self.method.as_str(), self.path)
    }
}

/// Tabla de rutas por método HTTP
pub struct RouteTable {
    /// Match exacto: path literal -> ruta (una tabla por método)
    statics: [HashMap<String, Route>; Method::COUNT],

    /// Rutas dinámicas en orden de registro (una lista por método)
    dynamics: [Vec<Route>; Method::COUNT],
}

impl RouteTable {
    /// Crea una tabla vacía
    pub fn new() -> Self {
        Self {
            statics: std::array::from_fn(|_| HashMap::new()),
            dynamics: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Registra una ruta
    ///
    /// Estática: entra al mapa exacto de su método (si el path literal ya
    /// estaba registrado, la última gana en silencio). Dinámica: se anexa
    /// al final de la lista de su método.
    pub fn register(&mut self, route: Route) {
        let idx = route.method.index();
        if route.is_static() {
            self.statics[idx].insert(route.path.clone(), route);
        } else {
            self.dynamics[idx].push(route);
        }
    }

    /// Resuelve (método, path) a un handler con sus argumentos capturados
    ///
    /// Primero match exacto (cero argumentos capturados); si falla,
    /// escaneo de las dinámicas en orden de registro. `None` = NotFound.
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::router::{Route, RouteTable};
    /// use miniweb::handler::{handler, Payload};
    /// use miniweb::http::Method;
    ///
    /// let mut table = RouteTable::new();
    /// let route = Route::new(Method::GET, "/u/:id", handler(|_ctx, args| {
    ///     Ok(Payload::Text(args[0].clone()))
    /// })).unwrap();
    /// table.register(route);
    ///
    /// let (_handler, args) = table.resolve(Method::GET, "/u/7").unwrap();
    /// assert_eq!(args, vec!["7"]);
    /// ```
    pub fn resolve(&self, method: Method, path: &str) -> Option<(Handler, Vec<String>)> {
        let idx = method.index();

        if let Some(route) = self.statics[idx].get(path) {
            return Some((Arc::clone(&route.handler), Vec::new()));
        }

        for route in &self.dynamics[idx] {
            if let Some(args) = route.matches(path) {
                return Some((Arc::clone(&route.handler), args));
            }
        }

        None
    }

    /// Cantidad total de rutas registradas
    pub fn route_count(&self) -> usize {
        let statics: usize = self.statics.iter().map(|m| m.len()).sum();
        let dynamics: usize = self.dynamics.iter().map(|v| v.len()).sum();
        statics + dynamics
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}
