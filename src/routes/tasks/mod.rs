pub mod routes;

use serde::Deserialize;

pub use crate::tasks::TaskInput;

// MODELS

/// `id` as sent by the toggle/delete forms and the edit link.
#[derive(Debug, Default, Deserialize)]
pub struct IdForm {
    #[serde(default)]
    pub id: String,
}

/// `/update` form: the task id plus the editable fields.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cost: String,
}

impl UpdateForm {
    pub fn into_parts(self) -> (String, TaskInput) {
        let input = TaskInput {
            task: self.task,
            due: self.due,
            duration: self.duration,
            cost: self.cost,
        };
        (self.id, input)
    }
}
