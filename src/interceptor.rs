//! # Interceptores
//! src/interceptor.rs
//!
//! Un interceptor envuelve el procesamiento de los requests cuyo path
//! matchea su pattern: corre código antes, decide si delega al resto de
//! la cadena llamando a `next`, y corre código después con el resultado.
//!
//! La cadena se construye UNA vez al congelar la aplicación, plegando la
//! lista de interceptores en orden inverso alrededor del paso terminal
//! (el lookup de rutas). Así el primero registrado queda más afuera:
//! entra primero y sale último. Los patterns se evalúan por request,
//! porque cada request trae un path distinto.

use crate::context::Context;
use crate::error::ConfigError;
use crate::handler::DispatchOutcome;
use std::sync::Arc;

/// Continuación hacia el resto de la cadena
///
/// El interceptor la invoca a lo sumo una vez. No llamarla es la forma
/// de cortocircuitar: el resultado del interceptor reemplaza al del
/// resto de la cadena (útil para auth, cache, etc.).
pub type Next<'a> = &'a mut dyn FnMut(&mut Context) -> DispatchOutcome;

/// Cuerpo de un interceptor
pub type InterceptorBody = Arc<dyn Fn(&mut Context, Next<'_>) -> DispatchOutcome + Send + Sync>;

/// Paso final de la cadena (y tipo de la cadena ya plegada)
pub type Terminal = Box<dyn Fn(&mut Context) -> DispatchOutcome + Send + Sync>;

/// Envuelve un closure como [`InterceptorBody`]
///
/// # Ejemplo
/// ```
/// use miniweb::error::HttpSignal;
/// use miniweb::interceptor::interceptor;
///
/// let auth = interceptor(|ctx, next| {
///     if ctx.request().header("Authorization").is_none() {
///         return Err(HttpSignal::unauthorized().into());
///     }
///     next(ctx)
/// });
/// ```
pub fn interceptor<F>(f: F) -> InterceptorBody
where
    F: Fn(&mut Context, Next<'_>) -> DispatchOutcome + Send + Sync + 'static,
{
    Arc::new(f)
}

// ==================== Patterns ====================

/// Predicado compilado de un pattern de interceptor
///
/// Solo existen dos formas: matcheo por prefijo o por sufijo del path.
/// Se compila una vez al registrar y se evalúa en cada request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPredicate {
    /// `prefix*` (o un literal sin `*`): el path empieza con el prefijo
    Prefix(String),

    /// `*suffix`: el path termina con el sufijo
    Suffix(String),
}

impl PatternPredicate {
    /// Evalúa el predicado contra un path concreto
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PatternPredicate::Prefix(prefix) => path.starts_with(prefix),
            PatternPredicate::Suffix(suffix) => path.ends_with(suffix),
        }
    }
}

/// Compila un pattern de interceptor a su predicado
///
/// Formas válidas: `literal` (prefijo), `prefix*`, `*suffix`. Un `*` en
/// cualquier otra posición, más de un `*`, o el comodín `?` son un error
/// de configuración.
///
/// # Ejemplo
/// ```
/// use miniweb::interceptor::{compile_pattern, PatternPredicate};
///
/// let p = compile_pattern("/admin*").unwrap();
/// assert!(p.matches("/admin/users"));
/// assert!(!p.matches("/public"));
///
/// let p = compile_pattern("*.json").unwrap();
/// assert!(p.matches("/api/data.json"));
/// ```
pub fn compile_pattern(pattern: &str) -> Result<PatternPredicate, ConfigError> {
    if pattern.contains('?') || pattern.matches('*').count() > 1 {
        return Err(ConfigError::InvalidInterceptorPattern(pattern.to_string()));
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return Ok(PatternPredicate::Suffix(suffix.to_string()));
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return Ok(PatternPredicate::Prefix(prefix.to_string()));
    }
    if pattern.contains('*') {
        // El único '*' está en el medio (ej: "a*b")
        return Err(ConfigError::InvalidInterceptorPattern(pattern.to_string()));
    }

    // Literal puro: se interpreta como prefijo (cubre el path y sus hijos)
    Ok(PatternPredicate::Prefix(pattern.to_string()))
}

// ==================== Cadena ====================

/// Un interceptor registrado: predicado + cuerpo
pub struct Interceptor {
    predicate: PatternPredicate,
    pattern: String,
    body: InterceptorBody,
}

impl Interceptor {
    /// Crea un interceptor, compilando su pattern
    pub fn new(pattern: &str, body: InterceptorBody) -> Result<Self, ConfigError> {
        Ok(Self {
            predicate: compile_pattern(pattern)?,
            pattern: pattern.to_string(),
            body,
        })
    }

    /// Pattern con el que se registró
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Display for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interceptor(pattern={})", self.pattern)
    }
}

/// Pliega la lista de interceptores alrededor del paso terminal
///
/// El pliegue va en orden inverso para que el PRIMERO registrado quede
/// más afuera. Cada capa evalúa su predicado contra el path del request:
/// si no matchea, delega directo a la capa interior sin ejecutar el
/// cuerpo. La cadena resultante es inmutable y se comparte entre los
/// threads que atienden conexiones.
pub fn build_chain(interceptors: Vec<Interceptor>, terminal: Terminal) -> Terminal {
    let mut chain = terminal;

    for interceptor in interceptors.into_iter().rev() {
        let inner = chain;
        let predicate = interceptor.predicate;
        let body = interceptor.body;

        chain = Box::new(move |ctx: &mut Context| {
            if predicate.matches(ctx.request().path()) {
                let mut next = |ctx: &mut Context| inner(ctx);
                body(ctx, &mut next)
            } else {
                inner(ctx)
            }
        });
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppShared;
    use crate::handler::Payload;
    use crate::http::Request;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn ctx_for(path: &str) -> Context {
        let raw = format!("GET {} HTTP/1.0\r\n\r\n", path);
        let request = Request::parse(raw.as_bytes()).unwrap();
        let shared = Arc::new(AppShared {
            document_root: PathBuf::new(),
            debug: false,
        });
        Context::enter(request, shared)
    }

    fn tracing_terminal(log: Arc<Mutex<Vec<String>>>) -> Terminal {
        Box::new(move |_ctx| {
            log.lock().unwrap().push("T".to_string());
            Ok(Payload::Text("terminal".to_string()))
        })
    }

    fn tracing_body(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> InterceptorBody {
        interceptor(move |ctx, next| {
            log.lock().unwrap().push(format!("{}-enter", name));
            let result = next(ctx);
            log.lock().unwrap().push(format!("{}-exit", name));
            result
        })
    }

    // ==================== Patterns ====================

    #[test]
    fn test_compile_prefix_pattern() {
        let p = compile_pattern("/admin*").unwrap();
        assert_eq!(p, PatternPredicate::Prefix("/admin".to_string()));
        assert!(p.matches("/admin"));
        assert!(p.matches("/admin/users"));
        assert!(!p.matches("/public"));
    }

    #[test]
    fn test_compile_suffix_pattern() {
        let p = compile_pattern("*.json").unwrap();
        assert_eq!(p, PatternPredicate::Suffix(".json".to_string()));
        assert!(p.matches("/api/data.json"));
        assert!(!p.matches("/api/data.xml"));
    }

    #[test]
    fn test_compile_bare_literal_is_prefix() {
        let p = compile_pattern("/api").unwrap();
        assert_eq!(p, PatternPredicate::Prefix("/api".to_string()));
        assert!(p.matches("/api/v1"));
    }

    #[test]
    fn test_compile_lone_star_matches_everything() {
        let p = compile_pattern("*").unwrap();
        assert!(p.matches("/cualquier/cosa"));
        assert!(p.matches("/"));
    }

    #[test]
    fn test_compile_rejects_infix_star() {
        let result = compile_pattern("a*b");
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidInterceptorPattern("a*b".to_string())
        );
    }

    #[test]
    fn test_compile_rejects_double_star_and_question_mark() {
        assert!(compile_pattern("*a*").is_err());
        assert!(compile_pattern("/api?").is_err());
    }

    // ==================== Cadena ====================

    #[test]
    fn test_chain_nesting_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let interceptors = vec![
            Interceptor::new("*", tracing_body("A", Arc::clone(&log))).unwrap(),
            Interceptor::new("*", tracing_body("B", Arc::clone(&log))).unwrap(),
        ];
        let chain = build_chain(interceptors, tracing_terminal(Arc::clone(&log)));

        let mut ctx = ctx_for("/x");
        let result = chain(&mut ctx).unwrap();
        assert!(matches!(result, Payload::Text(ref t) if t == "terminal"));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["A-enter", "B-enter", "T", "B-exit", "A-exit"]
        );
    }

    #[test]
    fn test_non_matching_interceptor_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let interceptors = vec![
            Interceptor::new("/admin*", tracing_body("A", Arc::clone(&log))).unwrap(),
        ];
        let chain = build_chain(interceptors, tracing_terminal(Arc::clone(&log)));

        let mut ctx = ctx_for("/public/index.html");
        chain(&mut ctx).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["T"]);

        log.lock().unwrap().clear();
        let mut ctx = ctx_for("/admin/panel");
        chain(&mut ctx).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["A-enter", "T", "A-exit"]);
    }

    #[test]
    fn test_interceptor_short_circuits_without_calling_next() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let guard = interceptor(|_ctx, _next| {
            Err(crate::error::HttpSignal::unauthorized().into())
        });
        let interceptors = vec![Interceptor::new("/admin*", guard).unwrap()];
        let chain = build_chain(interceptors, tracing_terminal(Arc::clone(&log)));

        let mut ctx = ctx_for("/admin/panel");
        let err = chain(&mut ctx).unwrap_err();
        assert!(matches!(
            err,
            crate::error::DispatchError::Signal(crate::error::HttpSignal::Status { .. })
        ));
        // El terminal nunca corrió
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_interceptor_observes_terminal_error() {
        let seen = Arc::new(Mutex::new(false));
        let seen_clone = Arc::clone(&seen);
        let observer = interceptor(move |ctx, next| {
            let result = next(ctx);
            if result.is_err() {
                *seen_clone.lock().unwrap() = true;
            }
            result
        });
        let failing: Terminal =
            Box::new(|_ctx| Err(crate::error::HttpSignal::not_found().into()));

        let chain = build_chain(vec![Interceptor::new("*", observer).unwrap()], failing);
        let mut ctx = ctx_for("/x");
        assert!(chain(&mut ctx).is_err());
        assert!(*seen.lock().unwrap());
    }

    #[test]
    fn test_interceptor_can_mutate_response_headers() {
        let stamp = interceptor(|ctx, next| {
            ctx.response_mut().set_header("X-Trace", "abc");
            next(ctx)
        });
        let chain = build_chain(
            vec![Interceptor::new("*", stamp).unwrap()],
            Box::new(|_ctx| Ok(Payload::Empty)),
        );

        let mut ctx = ctx_for("/x");
        chain(&mut ctx).unwrap();
        assert_eq!(ctx.response().header("X-Trace"), Some("abc"));
    }
}
