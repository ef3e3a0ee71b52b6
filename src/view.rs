//! # Templates (colaborador externo)
//! src/view.rs
//!
//! El framework NO interpreta sintaxis de templates. Un handler puede
//! retornar `Payload::View(Template)` — un marcador de render diferido
//! con nombre de template y modelo — y el motor de despacho delega en el
//! `TemplateEngine` configurado para obtener los bytes de la respuesta.

use serde_json::{Map, Value};

/// Marcador de render diferido: nombre de template + modelo
///
/// # Ejemplo
/// ```
/// use miniweb::view::Template;
///
/// let template = Template::new("perfil.html")
///     .with("nombre", "ana")
///     .with("edad", 30);
/// assert_eq!(template.name(), "perfil.html");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    model: Map<String, Value>,
}

impl Template {
    /// Crea un marcador para el template indicado, con modelo vacío
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            model: Map::new(),
        }
    }

    /// Agrega una entrada al modelo
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.model.insert(key.to_string(), value.into());
        self
    }

    /// Reemplaza el modelo completo con un valor serializable
    ///
    /// El valor debe serializar a un objeto JSON (un struct con campos
    /// nombrados); cualquier otra forma es un error.
    ///
    /// # Ejemplo
    /// ```
    /// use miniweb::view::Template;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Perfil { nombre: String, edad: u32 }
    ///
    /// let perfil = Perfil { nombre: "ana".to_string(), edad: 30 };
    /// let template = Template::new("perfil.html").with_model(&perfil).unwrap();
    /// assert_eq!(template.model().get("edad"), Some(&30.into()));
    /// ```
    pub fn with_model<T: serde::Serialize>(mut self, model: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(model)? {
            Value::Object(map) => {
                self.model = map;
                Ok(self)
            }
            other => Err(serde::ser::Error::custom(format!(
                "el modelo debe ser un objeto JSON, no {:?}",
                other
            ))),
        }
    }

    /// Nombre del template a renderizar
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modelo que recibe el motor de templates
    pub fn model(&self) -> &Map<String, Value> {
        &self.model
    }
}

/// Capacidad de render: `render(nombre, modelo) -> bytes`
///
/// La implementación real (Jinja-like, handlebars, lo que sea) vive fuera
/// del framework; acá solo se define la interfaz que el motor de despacho
/// invoca. Un error de render se trata como fault (500).
pub trait TemplateEngine: Send + Sync {
    /// Renderiza el template con el modelo dado y retorna los bytes del body
    fn render(
        &self,
        name: &str,
        model: &Map<String, Value>,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Motor por defecto: no renderiza nada, retorna un comentario HTML
///
/// Sirve para arrancar una aplicación sin motor configurado; cualquier
/// uso real debe reemplazarlo con `App::set_template_engine`.
#[derive(Debug, Default)]
pub struct NullEngine;

impl TemplateEngine for NullEngine {
    fn render(
        &self,
        _name: &str,
        _model: &Map<String, Value>,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(b"<!-- configure a template engine to render views -->".to_vec())
    }
}
