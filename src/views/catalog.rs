//! List pages for schedules, teachers and subjects.

use async_trait::async_trait;
use serde_json::Value;

use super::{list_items, payload, text};
use crate::api::{ScheduleApi, SubjectApi, TeacherApi};
use crate::core::view::{Section, View};
use crate::router::{LoadContext, LoadError, ViewLoader};

/// One table column: header plus the payload fields tried in order.
struct Column {
    header: &'static str,
    fields: &'static [&'static str],
}

const SCHEDULE_COLUMNS: &[Column] = &[
    Column { header: "Nombre", fields: &["name", "title"] },
    Column { header: "Periodo", fields: &["period", "semester"] },
    Column { header: "Estado", fields: &["status"] },
    Column { header: "Actualizado", fields: &["updatedAt", "createdAt"] },
];

const TEACHER_COLUMNS: &[Column] = &[
    Column { header: "Nombre", fields: &["name", "fullName"] },
    Column { header: "Correo", fields: &["email"] },
    Column { header: "Materias", fields: &["subjects"] },
    Column { header: "Horas", fields: &["maxHours", "hours"] },
];

const SUBJECT_COLUMNS: &[Column] = &[
    Column { header: "Código", fields: &["code"] },
    Column { header: "Nombre", fields: &["name"] },
    Column { header: "Horas Semanales", fields: &["weeklyHours", "hours"] },
    Column { header: "Profesor", fields: &["teacher", "teacherName"] },
];

fn table_view(
    title: &str,
    heading: &str,
    subtitle: &str,
    empty: &str,
    columns: &[Column],
    items: &[Value],
) -> View {
    let view = View::new(title).heading(heading, subtitle);
    if items.is_empty() {
        return view.with(Section::Paragraph {
            text: empty.to_string(),
        });
    }

    let rows = items
        .iter()
        .map(|item| columns.iter().map(|c| text(item, c.fields)).collect())
        .collect();
    view.with(Section::Table {
        columns: columns.iter().map(|c| c.header.to_string()).collect(),
        rows,
    })
}

pub struct ScheduleListLoader {
    schedules: ScheduleApi,
}

impl ScheduleListLoader {
    pub fn new(schedules: ScheduleApi) -> Self {
        Self { schedules }
    }
}

#[async_trait]
impl ViewLoader for ScheduleListLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        let data = payload(self.schedules.list(&[]).await)?;
        Ok(table_view(
            "Horarios",
            "Gestión de Horarios",
            "Genera y administra los horarios de la institución",
            "Aún no hay horarios generados.",
            SCHEDULE_COLUMNS,
            list_items(&data, "schedules"),
        ))
    }
}

pub struct TeacherListLoader {
    teachers: TeacherApi,
}

impl TeacherListLoader {
    pub fn new(teachers: TeacherApi) -> Self {
        Self { teachers }
    }
}

#[async_trait]
impl ViewLoader for TeacherListLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        let data = payload(self.teachers.list(&[]).await)?;
        Ok(table_view(
            "Profesores",
            "Gestión de Profesores",
            "Administra el personal docente y su disponibilidad",
            "No hay profesores registrados.",
            TEACHER_COLUMNS,
            list_items(&data, "teachers"),
        ))
    }
}

pub struct SubjectListLoader {
    subjects: SubjectApi,
}

impl SubjectListLoader {
    pub fn new(subjects: SubjectApi) -> Self {
        Self { subjects }
    }
}

#[async_trait]
impl ViewLoader for SubjectListLoader {
    async fn load(&self, _ctx: LoadContext) -> Result<View, LoadError> {
        let data = payload(self.subjects.list(&[]).await)?;
        Ok(table_view(
            "Materias",
            "Gestión de Materias",
            "Configura las materias y su carga horaria",
            "No hay materias registradas.",
            SUBJECT_COLUMNS,
            list_items(&data, "subjects"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_rows_follow_column_order() {
        let items = json!([
            {"name": "Ana Pérez", "email": "ana@colegio.edu", "subjects": ["Física"], "maxHours": 20},
            {"fullName": "Luis Gómez", "email": "luis@colegio.edu"}
        ]);
        let view = table_view(
            "Profesores",
            "Gestión de Profesores",
            "sub",
            "vacío",
            TEACHER_COLUMNS,
            items.as_array().unwrap(),
        );

        let Section::Table { columns, rows } = &view.sections[1] else {
            panic!("expected table");
        };
        assert_eq!(columns, &["Nombre", "Correo", "Materias", "Horas"]);
        assert_eq!(rows[0], vec!["Ana Pérez", "ana@colegio.edu", "Física", "20"]);
        assert_eq!(rows[1], vec!["Luis Gómez", "luis@colegio.edu", "-", "-"]);
    }

    #[test]
    fn test_empty_list_shows_message() {
        let view = table_view("Materias", "Gestión de Materias", "sub", "No hay materias registradas.", SUBJECT_COLUMNS, &[]);
        assert_eq!(
            view.sections[1],
            Section::Paragraph {
                text: "No hay materias registradas.".to_string()
            }
        );
    }
}
