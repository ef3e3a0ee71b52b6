//! # Compilador de Path Patterns
//! src/router/pattern.rs
//!
//! Convierte un path con segmentos nombrados (`/users/:id/posts/:n`) en
//! un matcher que prueba paths concretos y extrae los valores capturados.
//!
//! ## Algoritmo
//!
//! El path se divide en tokens alternados literal/variable usando el
//! delimitador `:identificador`. Cada literal se escapa para matchear
//! verbatim; cada variable se traduce a una captura `([^/]+)` (uno o más
//! caracteres que no sean `/`). El resultado se ancla en ambos extremos.
//!
//! Un path SIN variables se clasifica estático y no debe compilarse:
//! se matchea por igualdad exacta en la tabla de rutas.

use crate::error::ConfigError;
use regex::Regex;

/// Token del path: literal a matchear verbatim, o variable a capturar
#[derive(Debug, PartialEq, Eq)]
enum Token {
    Literal(String),
    Var(String),
}

/// Divide el path en tokens literal/variable
///
/// Una variable es `:` seguido de `[a-zA-Z_][a-zA-Z0-9_]*`. Un `:` que no
/// abre un identificador válido se trata como literal.
fn tokenize(path: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let chars: Vec<char> = path.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let starts_var = chars[i] == ':'
            && i + 1 < chars.len()
            && (chars[i + 1].is_ascii_alphabetic() || chars[i + 1] == '_');

        if starts_var {
            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            let mut name = String::new();
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                name.push(chars[i]);
                i += 1;
            }
            tokens.push(Token::Var(name));
        } else {
            literal.push(chars[i]);
            i += 1;
        }
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

/// Indica si el path contiene segmentos variables
///
/// # Ejemplo
/// ```
/// use miniweb::router::pattern::is_dynamic;
///
/// assert!(is_dynamic("/users/:id"));
/// assert!(!is_dynamic("/users"));
/// ```
pub fn is_dynamic(path: &str) -> bool {
    tokenize(path).iter().any(|t| matches!(t, Token::Var(_)))
}

/// Matcher compilado de un path dinámico
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    names: Vec<String>,
}

impl PathPattern {
    /// Compila un path con segmentos `:name` a un matcher anclado
    ///
    /// # Errores
    ///
    /// - `ConfigError::DuplicateParam` si un nombre de variable se repite
    ///   dentro del mismo pattern (error de configuración definido, no
    ///   comportamiento indefinido).
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::router::pattern::PathPattern;
    ///
    /// let pattern = PathPattern::compile("/a/:x/b/:y").unwrap();
    /// let args = pattern.matches("/a/5/b/hi").unwrap();
    /// assert_eq!(args, vec!["5", "hi"]);
    /// ```
    pub fn compile(path: &str) -> Result<Self, ConfigError> {
        let mut names = Vec::new();
        let mut pattern = String::from("^");

        for token in tokenize(path) {
            match token {
                Token::Literal(lit) => pattern.push_str(&regex::escape(&lit)),
                Token::Var(name) => {
                    if names.contains(&name) {
                        return Err(ConfigError::DuplicateParam(name));
                    }
                    names.push(name);
                    pattern.push_str("([^/]+)");
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| ConfigError::InvalidPathPattern(e.to_string()))?;
        Ok(Self { regex, names })
    }

    /// Matcher de prefijo con captura del resto del path
    ///
    /// Compila `^<prefix>(.+)$`: a diferencia de `:name`, la captura SÍ
    /// admite `/`. Lo usa la ruta de archivos estáticos.
    pub fn tail(prefix: &str) -> Result<Self, ConfigError> {
        let pattern = format!("^{}(.+)$", regex::escape(prefix));
        let regex = Regex::new(&pattern)
            .map_err(|e| ConfigError::InvalidPathPattern(e.to_string()))?;
        Ok(Self {
            regex,
            names: vec!["path".to_string()],
        })
    }

    /// Prueba un path concreto; en match retorna los valores capturados
    /// en orden de aparición (izquierda a derecha)
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(path)?;
        Some(
            (1..captures.len())
                .map(|i| captures.get(i).map_or(String::new(), |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Nombres de las variables, en orden de aparición
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
