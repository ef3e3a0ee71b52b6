//! # Aplicación y Motor de Despacho
//! src/app.rs
//!
//! `App` tiene dos vidas separadas por `freeze()`:
//!
//! 1. **Configuración** (single-threaded): se registran rutas,
//!    interceptores, document root, motor de templates. Cualquier
//!    mutación después de congelar es `ConfigError::AlreadyServing`.
//! 2. **Servicio** (compartida entre threads): `dispatch()` toma un
//!    request parseado y SIEMPRE produce una respuesta — los resultados
//!    anormales (señales, faults, panics) se mapean acá, nunca suben al
//!    loop del servidor.
//!
//! El despacho por request:
//!
//! ```text
//! Context::enter -> cadena de interceptores -> lookup de ruta -> handler
//!               -> clasificación del resultado -> Context::exit
//! ```

use crate::context::{AppShared, Context};
use crate::error::{ConfigError, DispatchError, HttpSignal};
use crate::handler::{DispatchOutcome, Handler, Payload};
use crate::http::response::error_body;
use crate::http::{Method, Request, Response, StatusCode};
use crate::interceptor::{build_chain, Interceptor, InterceptorBody, Terminal};
use crate::router::{Route, RouteTable};
use crate::static_files::static_file_handler;
use crate::view::{NullEngine, TemplateEngine};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

/// Valor del header identificador que llevan TODAS las respuestas,
/// incluso las que el transporte genera sin entrar al despacho
pub const POWERED_BY: &str = concat!("miniweb/", env!("CARGO_PKG_VERSION"));

/// La aplicación: tabla de rutas + interceptores + motor de despacho
pub struct App {
    router: RouteTable,
    interceptors: Vec<Interceptor>,
    document_root: PathBuf,
    debug: bool,
    static_prefix: Option<String>,
    template_engine: Arc<dyn TemplateEngine>,
    chain: Option<Terminal>,
    shared: Option<Arc<AppShared>>,
    serving: bool,
}

impl App {
    /// Crea una aplicación vacía, en fase de configuración
    pub fn new() -> Self {
        Self {
            router: RouteTable::new(),
            interceptors: Vec::new(),
            document_root: PathBuf::from("./public"),
            debug: false,
            static_prefix: None,
            template_engine: Arc::new(NullEngine),
            chain: None,
            shared: None,
            serving: false,
        }
    }

    // ==================== Configuración ====================

    fn guard_mutable(&self) -> Result<(), ConfigError> {
        if self.serving {
            Err(ConfigError::AlreadyServing)
        } else {
            Ok(())
        }
    }

    /// Registra una ruta
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::app::App;
    /// use miniweb::handler::{handler, Payload};
    /// use miniweb::http::Method;
    ///
    /// let mut app = App::new();
    /// app.route(Method::GET, "/hola/:nombre", handler(|_ctx, args| {
    ///     Ok(Payload::Text(format!("hola {}", args[0])))
    /// })).unwrap();
    /// ```
    pub fn route(&mut self, method: Method, path: &str, handler: Handler) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        let route = Route::new(method, path, handler)?;
        println!("➕ {}", route);
        self.router.register(route);
        Ok(())
    }

    /// Registra un interceptor (el orden de registro define el anidamiento)
    pub fn interceptor(&mut self, pattern: &str, body: InterceptorBody) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        let interceptor = Interceptor::new(pattern, body)?;
        println!("➕ {}", interceptor);
        self.interceptors.push(interceptor);
        Ok(())
    }

    /// Raíz de documentos para archivos estáticos
    pub fn set_document_root(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        self.document_root = path;
        Ok(())
    }

    /// Modo diagnóstico: los faults muestran detalle y backtrace al cliente
    pub fn set_debug(&mut self, debug: bool) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        self.debug = debug;
        Ok(())
    }

    /// Reemplaza el motor de templates (por defecto, [`NullEngine`])
    pub fn set_template_engine(&mut self, engine: Arc<dyn TemplateEngine>) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        self.template_engine = engine;
        Ok(())
    }

    /// Habilita el serving de archivos estáticos bajo el prefijo dado
    ///
    /// La ruta real se registra al congelar, al final de la tabla, para
    /// que ninguna ruta explícita quede tapada por el prefijo.
    pub fn enable_static_files(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.guard_mutable()?;
        self.static_prefix = Some(prefix.to_string());
        Ok(())
    }

    /// Congela la configuración y construye la cadena de despacho
    ///
    /// Idempotente: congelar dos veces no tiene efecto adicional. Después
    /// de congelar, la aplicación es segura de compartir entre threads
    /// (todo su estado de servicio es inmutable).
    pub fn freeze(&mut self) -> Result<(), ConfigError> {
        if self.serving {
            return Ok(());
        }

        if let Some(prefix) = self.static_prefix.take() {
            let prefix = if prefix.ends_with('/') {
                prefix
            } else {
                format!("{}/", prefix)
            };
            let route = Route::tail(Method::GET, &prefix, static_file_handler())?;
            println!("➕ {}", route);
            self.router.register(route);
        }

        let route_count = self.router.route_count();
        let interceptor_count = self.interceptors.len();

        self.shared = Some(Arc::new(AppShared {
            document_root: self.document_root.clone(),
            debug: self.debug,
        }));

        let router = Arc::new(std::mem::take(&mut self.router));
        let terminal: Terminal = Box::new(move |ctx: &mut Context| {
            let (handler, args) = router
                .resolve(ctx.request().method(), ctx.request().path())
                .ok_or(HttpSignal::not_found())?;
            handler(ctx, &args)
        });

        let interceptors = std::mem::take(&mut self.interceptors);
        self.chain = Some(build_chain(interceptors, terminal));
        self.serving = true;

        println!(
            "🧊 Aplicación lista: {} rutas, {} interceptores",
            route_count, interceptor_count
        );
        Ok(())
    }

    /// Indica si la aplicación ya fue congelada
    pub fn is_serving(&self) -> bool {
        self.serving
    }

    // ==================== Despacho ====================

    /// Atiende un request parseado y produce SIEMPRE una respuesta
    ///
    /// Nunca retorna error ni propaga panics: señales, faults y panics de
    /// handlers se convierten en respuestas acá. Llamarlo antes de
    /// `freeze()` responde 500 (y lo loggea como error de programación).
    pub fn dispatch(&self, request: Request) -> Response {
        let mut response = match (&self.chain, &self.shared) {
            (Some(chain), Some(shared)) => self.run(chain, Arc::clone(shared), request),
            _ => {
                eprintln!("💥 dispatch() llamado antes de freeze()");
                Response::error(StatusCode::InternalServerError)
            }
        };

        response.set_header("X-Powered-By", POWERED_BY);
        response
    }

    // Corre la cadena dentro del ciclo de vida del contexto
    fn run(&self, chain: &Terminal, shared: Arc<AppShared>, request: Request) -> Response {
        let mut ctx = Context::enter(request, shared);

        let outcome: DispatchOutcome =
            match panic::catch_unwind(AssertUnwindSafe(|| chain(&mut ctx))) {
                Ok(outcome) => outcome,
                Err(payload) => Err(DispatchError::fault(panic_message(payload))),
            };

        self.apply(&mut ctx, outcome);

        // El contexto muere acá en TODOS los caminos (normal, señal, fault)
        ctx.exit()
    }

    // Clasifica el resultado de la cadena y lo vuelca en la respuesta
    fn apply(&self, ctx: &mut Context, outcome: DispatchOutcome) {
        match outcome {
            Ok(Payload::Empty) => {}

            Ok(Payload::Text(text)) => ctx.response_mut().set_body(text.into_bytes()),

            Ok(Payload::Bytes(bytes)) => ctx.response_mut().set_body(bytes),

            Ok(Payload::View(template)) => {
                match self.template_engine.render(template.name(), template.model()) {
                    Ok(bytes) => ctx.response_mut().set_body(bytes),
                    // Un template que no renderiza es un fallo del servidor
                    Err(e) => self.apply_fault(ctx, DispatchError::fault(e)),
                }
            }

            Ok(Payload::Stream(chunks)) => ctx.response_mut().set_body_stream(chunks),

            Err(DispatchError::Signal(HttpSignal::Status { code, headers })) => {
                let response = ctx.response_mut();
                response.set_status(code);
                response.set_header("Content-Type", "text/html; charset=utf-8");
                response.set_body(error_body(code));
                for (name, value) in &headers {
                    response.add_header(name, value);
                }
            }

            Err(DispatchError::Signal(HttpSignal::Redirect { code, location, headers })) => {
                let response = ctx.response_mut();
                response.set_status(code);
                response.set_header("Location", &location);
                response.clear_body();
                for (name, value) in &headers {
                    response.add_header(name, value);
                }
            }

            Err(fault @ DispatchError::Fault { .. }) => self.apply_fault(ctx, fault),
        }
    }

    // Un fault SIEMPRE se loggea con detalle; lo que ve el cliente depende
    // del modo debug
    fn apply_fault(&self, ctx: &mut Context, fault: DispatchError) {
        let DispatchError::Fault { source, backtrace } = fault else {
            return;
        };

        eprintln!(
            "💥 Fault atendiendo {} {}: {}",
            ctx.request().method().as_str(),
            ctx.request().path(),
            source
        );
        eprintln!("{}", backtrace);

        let debug = ctx.app().debug;
        let response = ctx.response_mut();
        response.set_status(StatusCode::InternalServerError);
        response.set_header("Content-Type", "text/html; charset=utf-8");

        if debug {
            let body = format!(
                "<html><body><h1>{}</h1><pre>{}\n\n{}</pre></body></html>",
                StatusCode::InternalServerError,
                escape_html(&source.to_string()),
                escape_html(&backtrace.to_string()),
            );
            response.set_body(body.into_bytes());
        } else {
            response.set_body(error_body(StatusCode::InternalServerError));
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// Describe el payload de un panic (usualmente &str o String)
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic: (payload no imprimible)".to_string()
    }
}

// Escapa texto para incrustarlo en el body HTML de diagnóstico
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
