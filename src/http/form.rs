//! # Parsing de Formularios (colaborador de body)
//! src/http/form.rs
//!
//! Convierte el body crudo (según su content-type) en un mapa de campos.
//! Un campo puede ser:
//!
//! - valor único (`FormValue::Single`)
//! - valores múltiples en orden (`FormValue::Multiple`, keys repetidas)
//! - referencia a archivo subido (`FormValue::File`)
//!
//! Este módulo implementa `application/x-www-form-urlencoded` (y el
//! fallback al query string). El parsing multipart es un colaborador
//! externo: acá solo se define `UploadedFile`, la interfaz que ese
//! colaborador produce.

use std::collections::HashMap;

/// Archivo subido via multipart (interfaz del colaborador externo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Nombre original del archivo en el cliente
    pub filename: String,
    /// Contenido del archivo
    pub content: Vec<u8>,
}

/// Valor de un campo de formulario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    /// Un solo valor
    Single(String),
    /// Varios valores para la misma key, en orden de aparición
    Multiple(Vec<String>),
    /// Referencia a archivo subido
    File(UploadedFile),
}

/// Campos de formulario parseados
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, FormValue>,
}

impl FormData {
    /// Parsea un body urlencoded (`a=1&b=2&a=3`)
    ///
    /// Keys repetidas se acumulan como `FormValue::Multiple` preservando
    /// el orden de aparición.
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::http::form::FormData;
    ///
    /// let form = FormData::parse_urlencoded("name=ana&tag=a&tag=b");
    /// assert_eq!(form.get("name"), Some("ana"));
    /// assert_eq!(form.get_all("tag"), vec!["a", "b"]);
    /// ```
    pub fn parse_urlencoded(raw: &str) -> Self {
        let mut form = FormData::default();

        for pair in raw.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = match pair.find('=') {
                Some(eq_pos) => (
                    percent_decode(&pair[..eq_pos]),
                    percent_decode(&pair[eq_pos + 1..]),
                ),
                // Campo sin valor (ej: "?debug")
                None => (percent_decode(pair), String::new()),
            };

            form.push(key, value);
        }

        form
    }

    // Acumula un valor, promoviendo Single -> Multiple si la key se repite
    fn push(&mut self, key: String, value: String) {
        match self.fields.get_mut(&key) {
            None => {
                self.fields.insert(key, FormValue::Single(value));
            }
            Some(FormValue::Single(first)) => {
                let first = std::mem::take(first);
                self.fields.insert(key, FormValue::Multiple(vec![first, value]));
            }
            Some(FormValue::Multiple(values)) => {
                values.push(value);
            }
            // Un archivo no se mezcla con valores de texto
            Some(FormValue::File(_)) => {}
        }
    }

    /// Inserta una referencia a archivo (la usa el colaborador multipart)
    pub fn insert_file(&mut self, key: &str, file: UploadedFile) {
        self.fields.insert(key.to_string(), FormValue::File(file));
    }

    /// Primer valor del campo, si existe y es de texto
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.fields.get(key)? {
            FormValue::Single(v) => Some(v),
            FormValue::Multiple(values) => values.first().map(|s| s.as_str()),
            FormValue::File(_) => None,
        }
    }

    /// Todos los valores del campo, en orden
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        match self.fields.get(key) {
            Some(FormValue::Single(v)) => vec![v.as_str()],
            Some(FormValue::Multiple(values)) => values.iter().map(|s| s.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// Archivo subido bajo esa key, si existe
    pub fn file(&self, key: &str) -> Option<&UploadedFile> {
        match self.fields.get(key)? {
            FormValue::File(file) => Some(file),
            _ => None,
        }
    }

    /// Cantidad de campos
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Indica si no hay campos
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decodifica percent-encoding (`%XX`) y `+` como espacio
///
/// # Ejemplo
/// ```
/// use miniweb::http::form::percent_decode;
///
/// assert_eq!(percent_decode("hola%20mundo"), "hola mundo");
/// assert_eq!(percent_decode("a+b"), "a b");
/// ```
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                // Intentar decodificar %XX; si no son hex, se deja literal
                if i + 2 < bytes.len() {
                    let hi = (bytes[i + 1] as char).to_digit(16);
                    let lo = (bytes[i + 2] as char).to_digit(16);
                    if let (Some(hi), Some(lo)) = (hi, lo) {
                        out.push((hi * 16 + lo) as u8);
                        i += 3;
                        continue;
                    }
                }
                out.push(b'%');
                i += 1;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
