//! # miniweb - Entry Point
//! src/main.rs
//!
//! Binario de demostración: arma una aplicación con rutas estáticas y
//! dinámicas, un interceptor de trazado, serving de archivos estáticos,
//! y arranca el servidor.

use miniweb::app::App;
use miniweb::config::Config;
use miniweb::error::HttpSignal;
use miniweb::handler::handler;
use miniweb::http::Method;
use miniweb::interceptor::interceptor;
use miniweb::server::Server;

fn build_app(config: &Config) -> Result<App, miniweb::error::ConfigError> {
    let mut app = App::new();
    app.set_document_root(config.document_root.clone())?;
    app.set_debug(config.debug)?;

    // Interceptor de trazado sobre todo el espacio de paths
    app.interceptor(
        "*",
        interceptor(|ctx, next| {
            ctx.response_mut().set_header("X-Trace", "miniweb-demo");
            next(ctx)
        }),
    )?;

    app.route(
        Method::GET,
        "/",
        handler(|_ctx, _args| Ok("<h1>miniweb</h1><p>servidor de demostración</p>".into())),
    )?;

    app.route(
        Method::GET,
        "/hola/:nombre",
        handler(|_ctx, args| Ok(format!("<h1>hola, {}!</h1>", args[0]).into())),
    )?;

    // Eco del query string / form urlencoded
    app.route(
        Method::POST,
        "/eco",
        handler(|ctx, _args| {
            let mensaje = ctx
                .request()
                .param("mensaje")
                .unwrap_or("(sin mensaje)")
                .to_string();
            Ok(format!("eco: {}", mensaje).into())
        }),
    )?;

    app.route(
        Method::GET,
        "/viejo",
        handler(|_ctx, _args| Err(HttpSignal::redirect("/").into())),
    )?;

    app.enable_static_files("/static")?;

    Ok(app)
}

fn main() {
    println!("=================================");
    println!("  miniweb HTTP/1.0 Server");
    println!("=================================\n");

    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }
    config.print_summary();
    println!();

    let app = match build_app(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("💥 Error de configuración: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::new(config, app) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error de configuración: {}", e);
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
