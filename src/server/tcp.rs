//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Servidor TCP que maneja múltiples conexiones simultáneas usando
//! threads: cada conexión se procesa en su propio thread. El trabajo por
//! request vive en la aplicación; acá solo se lee el socket, se parsea
//! y se escribe la respuesta (bloque a bloque si es streaming).

use crate::config::Config;
use crate::app::App;
use crate::error::ConfigError;
use crate::http::{Request, Response, StatusCode};
use std::io::Read;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Servidor HTTP/1.0 concurrente
pub struct Server {
    config: Config,
    app: Arc<App>,
}

impl Server {
    /// Crea el servidor, congelando la aplicación si hace falta
    ///
    /// Después de esto la aplicación es inmutable y se comparte entre
    /// los threads de conexión.
    pub fn new(config: Config, mut app: App) -> Result<Self, ConfigError> {
        app.freeze()?;
        Ok(Self {
            config,
            app: Arc::new(app),
        })
    }

    /// Loop principal: acepta conexiones y las atiende en threads
    pub fn run(&self) -> std::io::Result<()> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);
        println!("[*] Modo concurrente: un thread por conexion\n");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let app = Arc::clone(&self.app);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {} (spawning thread)", peer_addr);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection_static(stream, app) {
                            eprintln!("   ❌ Error en thread: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    fn handle_connection_static(mut stream: TcpStream, app: Arc<App>) -> std::io::Result<()> {
        let start = Instant::now();

        // Generar Request ID único
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        start.elapsed().as_nanos().hash(&mut hasher);
        thread::current().id().hash(&mut hasher);
        let request_id = format!("{:016x}", hasher.finish());

        let mut buffer = [0u8; 8192];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            println!("   ✅ Conexión cerrada");
            return Ok(());
        }

        let peer_addr = stream.peer_addr().map(|addr| addr.to_string()).ok();

        let mut response = match Request::parse(&buffer[..bytes_read]) {
            Ok(mut request) => {
                if let Some(addr) = &peer_addr {
                    request.set_remote_addr(addr);
                }
                println!(
                    "   ✅ {} {} [req_id: {}]",
                    request.method().as_str(),
                    request.path(),
                    &request_id[..8]
                );
                app.dispatch(request)
            }
            Err(e) => {
                // Request malformado: 400 directo, sin entrar al despacho.
                // El header identificador viaja igual que en las respuestas
                // despachadas.
                println!("   ❌ Parse error: {}", e);
                Response::error(StatusCode::BadRequest)
                    .with_header("X-Powered-By", crate::app::POWERED_BY)
            }
        };

        response.add_header("X-Request-Id", &request_id);

        let status = response.status();
        response.write_to(&mut stream)?;

        let latency = start.elapsed();
        println!("   ✅ {} ({:.2}ms)\n", status, latency.as_secs_f64() * 1000.0);

        Ok(())
    }
}
