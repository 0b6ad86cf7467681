use sprintsync_storage::Task;

/// Daily plan for a user's tasks.
// TODO: replace the canned plan with an LLM call over `tasks`
pub fn daily_plan(_tasks: &[Task]) -> Vec<String> {
    vec![
        "Focus on completing in-progress tasks first.".to_string(),
        "Start one high-priority TODO task.".to_string(),
        "Review completed tasks and prepare next steps.".to_string(),
    ]
}
