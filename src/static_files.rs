//! # Archivos Estáticos
//! src/static_files.rs
//!
//! Handler que sirve archivos desde el document root de la aplicación.
//! Se registra como ruta de prefijo (captura el resto del path) cuando
//! la aplicación habilita el serving estático.
//!
//! El path capturado se valida ANTES de tocar el filesystem: cualquier
//! componente que no sea un nombre normal (`..`, raíces absolutas) se
//! responde 404 sin distinguirlo de un archivo inexistente, para no
//! revelar la estructura del filesystem.

use crate::error::HttpSignal;
use crate::handler::{handler, Handler, Payload};
use crate::http::ChunkedFile;
use std::io;
use std::path::{Component, Path};

/// Content-Type según la extensión del archivo
///
/// Extensión desconocida o ausente: `application/octet-stream`, que los
/// navegadores tratan como descarga.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Handler de archivos estáticos
///
/// Recibe en `args[0]` el resto del path capturado por la ruta de
/// prefijo, lo resuelve contra el document root y responde el contenido
/// en streaming por bloques, con el Content-Type de la extensión.
///
/// Archivo inexistente, directorio, o path con componentes de traversal:
/// señal 404. Otros errores de I/O suben como fault (500).
pub fn static_file_handler() -> Handler {
    handler(|ctx, args| {
        let tail = args.first().map(String::as_str).unwrap_or("");

        let relative = Path::new(tail);
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if tail.is_empty() || traversal {
            return Err(HttpSignal::not_found().into());
        }

        let full = ctx.app().document_root.join(relative);
        match std::fs::metadata(&full) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(HttpSignal::not_found().into()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(HttpSignal::not_found().into())
            }
            Err(e) => return Err(e.into()),
        }

        ctx.response_mut().set_header("Content-Type", mime_for(&full));
        let stream = ChunkedFile::open(&full)?;
        Ok(Payload::Stream(stream))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppShared, Context};
    use crate::error::DispatchError;
    use crate::handler::DispatchOutcome;
    use crate::http::{Request, StatusCode};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!("miniweb_static_{}", name));
        std::fs::create_dir_all(root.join("css")).unwrap();
        std::fs::write(root.join("index.html"), b"<h1>inicio</h1>").unwrap();
        std::fs::write(root.join("css").join("app.css"), b"body{}").unwrap();
        root
    }

    fn serve(root: &Path, tail: &str) -> (Context, DispatchOutcome) {
        let request = Request::parse(b"GET /static/x HTTP/1.0\r\n\r\n").unwrap();
        let shared = Arc::new(AppShared {
            document_root: root.to_path_buf(),
            debug: false,
        });
        let mut ctx = Context::enter(request, shared);
        let h = static_file_handler();
        let outcome = h(&mut ctx, &[tail.to_string()]);
        (ctx, outcome)
    }

    fn expect_not_found(outcome: DispatchOutcome) {
        match outcome {
            Err(DispatchError::Signal(signal)) => {
                assert_eq!(signal.code(), StatusCode::NotFound)
            }
            other => panic!("expected 404 signal, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_serves_file_with_mime_type() {
        let root = temp_root("serve");
        let (ctx, outcome) = serve(&root, "css/app.css");
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(ctx.response().header("Content-Type"), Some("text/css"));
        match outcome.unwrap() {
            Payload::Stream(chunks) => {
                let bytes: Vec<u8> = chunks.map(|b| b.unwrap()).flatten().collect();
                assert_eq!(bytes, b"body{}");
            }
            _ => panic!("expected stream payload"),
        }
    }

    #[test]
    fn test_missing_file_is_404_signal() {
        let root = temp_root("missing");
        let (_ctx, outcome) = serve(&root, "nada.txt");
        std::fs::remove_dir_all(&root).ok();
        expect_not_found(outcome);
    }

    #[test]
    fn test_traversal_is_404_signal() {
        let root = temp_root("traversal");
        let (_ctx, outcome) = serve(&root, "../secreto.txt");
        std::fs::remove_dir_all(&root).ok();
        expect_not_found(outcome);
    }

    #[test]
    fn test_directory_is_404_signal() {
        let root = temp_root("dir");
        let (_ctx, outcome) = serve(&root, "css");
        std::fs::remove_dir_all(&root).ok();
        expect_not_found(outcome);
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(mime_for(Path::new("a.JSON")), "application/json");
        assert_eq!(mime_for(Path::new("a.png")), "image/png");
        assert_eq!(mime_for(Path::new("sin_extension")), "application/octet-stream");
    }
}
