//! Backend path table. Paths are relative to the configured base URL.

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REFRESH: &str = "/auth/refresh";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
}

pub mod users {
    pub const PROFILE: &str = "/users/profile";
    pub const UPDATE: &str = "/users/update";
    pub const DELETE: &str = "/users/delete";
}

pub mod schedules {
    pub const GENERATE: &str = "/schedules/generate";
    pub const LIST: &str = "/schedules/list";

    pub fn by_id(id: &str) -> String {
        format!("/schedules/{id}")
    }

    pub fn export(id: &str) -> String {
        format!("/schedules/{id}/export")
    }
}

pub mod teachers {
    pub const LIST: &str = "/teachers/list";
    pub const CREATE: &str = "/teachers/create";

    pub fn by_id(id: &str) -> String {
        format!("/teachers/{id}")
    }

    pub fn availability(id: &str) -> String {
        format!("/teachers/{id}/availability")
    }
}

pub mod subjects {
    pub const LIST: &str = "/subjects/list";
    pub const CREATE: &str = "/subjects/create";

    pub fn by_id(id: &str) -> String {
        format!("/subjects/{id}")
    }
}

pub mod analytics {
    pub const DASHBOARD: &str = "/analytics/dashboard";
    pub const PROJECTS: &str = "/analytics/projects";
    pub const TEACHERS: &str = "/analytics/teachers";
    pub const SUBJECTS: &str = "/analytics/subjects";
}
