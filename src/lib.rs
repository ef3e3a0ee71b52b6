//! # miniweb
//! src/lib.rs
//!
//! Micro-framework HTTP/1.0 embebible: rutas estáticas y dinámicas,
//! cadena de interceptores, contexto por request y un motor de despacho
//! que SIEMPRE produce una respuesta.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing del protocolo, respuesta en progreso, cookies, forms
//! - `config`: Configuración por CLI con fallback a variables de entorno
//! - `error`: Errores de configuración, señales HTTP y faults
//! - `handler`: Tipo de los handlers y su resultado
//! - `context`: Estado con alcance de un request
//! - `view`: Templates como colaborador externo
//! - `router`: Tabla de rutas y compilación de path patterns
//! - `interceptor`: Cadena de interceptores por pattern de path
//! - `app`: La aplicación y el motor de despacho
//! - `static_files`: Serving de archivos desde el document root
//! - `server`: Loop TCP, un thread por conexión
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use miniweb::app::App;
//! use miniweb::config::Config;
//! use miniweb::handler::handler;
//! use miniweb::http::Method;
//! use miniweb::server::Server;
//!
//! let mut app = App::new();
//! app.route(Method::GET, "/hola/:nombre", handler(|_ctx, args| {
//!     Ok(format!("hola {}", args[0]).into())
//! })).unwrap();
//!
//! let server = Server::new(Config::default(), app).unwrap();
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod interceptor;
pub mod router;
pub mod server;
pub mod static_files;
pub mod view;
