// Todo list derivation - membership filtering and ordering per list selector

use chrono::{DateTime, Utc};

use crate::models::Todo;

/// Which todo list is being viewed. The smart lists (`Today`, `Planned`,
/// `Completed`, `All`) are derived; `Named` matches `list_name` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoList {
    All,
    Today,
    Planned,
    Completed,
    Named(String),
}

impl TodoList {
    /// The list a quick-added todo should land in while this selector is
    /// active: a named list keeps it, smart lists fall back to the default.
    pub fn target_list(&self) -> &str {
        match self {
            TodoList::Named(name) => name,
            _ => crate::models::DEFAULT_TODO_LIST,
        }
    }
}

impl std::str::FromStr for TodoList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => TodoList::All,
            "today" => TodoList::Today,
            "planned" => TodoList::Planned,
            "completed" => TodoList::Completed,
            name => TodoList::Named(name.to_string()),
        })
    }
}

fn member(todo: &Todo, list: &TodoList, now: DateTime<Utc>) -> bool {
    match list {
        TodoList::All => true,
        TodoList::Today => todo.created_at.date_naive() == now.date_naive(),
        TodoList::Planned => todo.due_date.is_some(),
        TodoList::Completed => todo.completed,
        TodoList::Named(name) => todo.list_name == *name,
    }
}

/// Filter and order a todo collection for display: unfinished first (newest
/// created first), then completed (newest completion first, falling back to
/// creation time).
pub fn filter_todos<'a>(todos: &'a [Todo], list: &TodoList, now: DateTime<Utc>) -> Vec<&'a Todo> {
    let mut unfinished: Vec<&Todo> = todos
        .iter()
        .filter(|t| member(t, list, now) && !t.completed)
        .collect();
    unfinished.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut completed: Vec<&Todo> = todos
        .iter()
        .filter(|t| member(t, list, now) && t.completed)
        .collect();
    completed.sort_by(|a, b| {
        b.completed_at
            .unwrap_or(b.created_at)
            .cmp(&a.completed_at.unwrap_or(a.created_at))
    });

    unfinished.extend(completed);
    unfinished
}

/// Sidebar badge numbers for the smart lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCounts {
    pub all: usize,
    pub today: usize,
    pub planned: usize,
    pub completed: usize,
}

pub fn list_counts(todos: &[Todo], now: DateTime<Utc>) -> ListCounts {
    ListCounts {
        all: todos.len(),
        today: todos
            .iter()
            .filter(|t| member(t, &TodoList::Today, now))
            .count(),
        planned: todos
            .iter()
            .filter(|t| member(t, &TodoList::Planned, now))
            .count(),
        completed: todos.iter().filter(|t| t.completed).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap()
    }

    fn sample() -> Vec<Todo> {
        let mut gym = Todo::new("gym", "Health", at(10, 8));
        gym.due_date = Some(at(12, 9));

        let mut groceries = Todo::new("groceries", "Scratch", at(10, 9));
        groceries.toggle(at(10, 18));

        let old = Todo::new("old errand", "Scratch", at(2, 9));

        vec![gym, groceries, old]
    }

    #[test]
    fn today_list_matches_creation_date() {
        let todos = sample();
        let view = filter_todos(&todos, &TodoList::Today, at(10, 20));
        let names: Vec<&str> = view.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(names, vec!["gym", "groceries"]);
    }

    #[test]
    fn planned_list_requires_a_due_date() {
        let todos = sample();
        let view = filter_todos(&todos, &TodoList::Planned, at(10, 20));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].content, "gym");
    }

    #[test]
    fn named_list_matches_exactly() {
        let todos = sample();
        let view = filter_todos(&todos, &TodoList::Named("Health".to_string()), at(10, 20));
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].content, "gym");
    }

    #[test]
    fn unfinished_come_before_completed() {
        let todos = sample();
        let view = filter_todos(&todos, &TodoList::All, at(10, 20));
        let names: Vec<&str> = view.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(names, vec!["gym", "old errand", "groceries"]);
    }

    #[test]
    fn counts_cover_smart_lists() {
        let todos = sample();
        let counts = list_counts(&todos, at(10, 20));
        assert_eq!(counts.all, 3);
        assert_eq!(counts.today, 2);
        assert_eq!(counts.planned, 1);
        assert_eq!(counts.completed, 1);
    }

    #[test]
    fn quick_add_target_falls_back_to_default_on_smart_lists() {
        assert_eq!(TodoList::Today.target_list(), crate::models::DEFAULT_TODO_LIST);
        assert_eq!(
            TodoList::Named("Work".to_string()).target_list(),
            "Work"
        );
    }
}
