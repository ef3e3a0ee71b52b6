//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por línea de comandos con fallback a variables de
//! entorno. La precedencia es: argumento CLI > variable de entorno >
//! valor por defecto.

use clap::Parser;
use std::path::PathBuf;

/// Configuración del servidor HTTP
#[derive(Parser, Debug, Clone)]
#[command(name = "miniweb")]
#[command(about = "Servidor HTTP con rutas, interceptores y archivos estáticos")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Dirección en la que escucha el servidor
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Raíz de documentos para archivos estáticos
    #[arg(long, default_value = "./public", env = "DOCUMENT_ROOT")]
    pub document_root: PathBuf,

    /// Modo diagnóstico: los errores 500 muestran detalle al cliente
    #[arg(long, env = "HTTP_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Parsea la configuración desde los argumentos del proceso
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa `host:puerto` para el bind
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración antes de arrancar
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("El puerto no puede ser 0".to_string());
        }
        if self.host.is_empty() {
            return Err("El host no puede estar vacío".to_string());
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración activa
    pub fn print_summary(&self) {
        println!("⚙️  Configuración:");
        println!("   Dirección:     {}", self.address());
        println!("   Document root: {}", self.document_root.display());
        println!("   Debug:         {}", if self.debug { "sí" } else { "no" });
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            document_root: PathBuf::from("./public"),
            debug: false,
        }
    }
}
