//! Pages rendered from local state only: configuration and help.

use async_trait::async_trait;

use crate::core::constants::{APP_NAME, APP_VERSION, CLASS_PERIODS, schedule_generation};
use crate::core::preferences::Preferences;
use crate::core::view::{Section, View};
use crate::router::{LoadContext, LoadError, ViewLoader};

pub struct ConfigurationLoader {
    preferences: Preferences,
}

impl ConfigurationLoader {
    pub fn new(preferences: Preferences) -> Self {
        Self { preferences }
    }

    fn view(&self) -> View {
        let periods = match (CLASS_PERIODS.first(), CLASS_PERIODS.last()) {
            (Some(first), Some(last)) => format!(
                "{} bloques, {} a {}",
                CLASS_PERIODS.len(),
                first.start,
                last.end
            ),
            _ => "-".to_string(),
        };

        View::new("Configuración")
            .heading("Configuración", "Preferencias de la aplicación")
            .with(Section::Fields {
                items: vec![
                    ("Tema".to_string(), self.preferences.theme().label().to_string()),
                    ("Idioma".to_string(), self.preferences.language().code().to_string()),
                ],
            })
            .with(Section::Heading {
                text: "Generación de Horarios".to_string(),
                subtitle: None,
            })
            .with(Section::Fields {
                items: vec![
                    ("Periodos de clase".to_string(), periods),
                    (
                        "Máximo de clases consecutivas".to_string(),
                        schedule_generation::MAX_CONSECUTIVE_CLASSES.to_string(),
                    ),
                    (
                        "Descanso mínimo (min)".to_string(),
                        schedule_generation::MIN_BREAK_TIME.to_string(),
                    ),
                ],
            })
            .with(Section::Fields {
                items: vec![
                    ("Aplicación".to_string(), APP_NAME.to_string()),
                    ("Versión".to_string(), APP_VERSION.to_string()),
                ],
            })
    }
}

#[async_trait]
impl ViewLoader for ConfigurationLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        Ok(self.view())
    }
}

const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "Primeros pasos",
        "Registra tus profesores y materias antes de generar el primer horario.",
    ),
    (
        "Horarios",
        "El generador respeta la disponibilidad de cada profesor y la carga horaria de cada materia.",
    ),
    (
        "Exportación",
        "Los horarios generados pueden descargarse en PDF, Excel o CSV.",
    ),
];

const FAQ: &[(&str, &str)] = &[
    (
        "¿Cómo agrego un nuevo profesor?",
        "Ve a la sección Profesores y usa el botón \"Nuevo Profesor\". Completa sus datos y su disponibilidad semanal.",
    ),
    (
        "¿Cómo genero un horario?",
        "En la sección Horarios elige el periodo y pulsa \"Generar\". El proceso puede tardar unos segundos.",
    ),
    (
        "¿Puedo exportar los horarios?",
        "Sí. Abre un horario y elige el formato de exportación: PDF, Excel o CSV.",
    ),
    (
        "¿Qué pasa si un profesor no tiene disponibilidad suficiente?",
        "El generador lo indicará como conflicto para que ajustes su disponibilidad o la carga de la materia.",
    ),
];

pub struct HelpLoader;

#[async_trait]
impl ViewLoader for HelpLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        let mut view = View::new("Ayuda").heading("Centro de Ayuda", "Encuentra respuestas a tus preguntas");
        for (title, body) in HELP_TOPICS {
            view = view
                .with(Section::Heading {
                    text: title.to_string(),
                    subtitle: None,
                })
                .with(Section::Paragraph {
                    text: body.to_string(),
                });
        }
        Ok(view
            .with(Section::Heading {
                text: "Preguntas Frecuentes".to_string(),
                subtitle: None,
            })
            .with(Section::Faq {
                items: FAQ
                    .iter()
                    .map(|(q, a)| (q.to_string(), a.to_string()))
                    .collect(),
            }))
    }
}
