//! Per-tab task registry: at most one live task per tab.

use std::collections::HashMap;

use log::{debug, info};
use parking_lot::Mutex;

use crate::models::{TabId, Task, TaskId};

#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: Mutex<HashMap<TabId, Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `task` as the tab's live task. A previous task for the same tab
    /// is cancelled and returned.
    pub fn register(&self, task: Task) -> Option<Task> {
        let tab_id = task.tab_id;
        let previous = self.tasks.lock().insert(tab_id, task);
        if let Some(old) = &previous {
            old.cancel();
            info!("Superseded task {} for tab {}", old.id, tab_id);
        }
        previous
    }

    /// Cancel and drop the tab's task. No-op if there is none.
    pub fn cancel(&self, tab_id: TabId) -> Option<Task> {
        let removed = self.tasks.lock().remove(&tab_id);
        if let Some(task) = &removed {
            task.cancel();
            info!("🛑 Translation cancelled for tab: {}", tab_id);
        }
        removed
    }

    /// Remove the tab's entry only if it still belongs to `task_id`.
    pub fn finish(&self, tab_id: TabId, task_id: TaskId) -> bool {
        let mut tasks = self.tasks.lock();
        match tasks.get(&tab_id) {
            Some(current) if current.id == task_id => {
                tasks.remove(&tab_id);
                true
            }
            Some(_) => {
                debug!("Task {} finished after being replaced on tab {}", task_id, tab_id);
                false
            }
            None => false,
        }
    }

    /// Cancel everything, e.g. on host shutdown. Returns how many tasks were live.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Task> = self.tasks.lock().drain().map(|(_, task)| task).collect();
        for task in &drained {
            task.cancel();
        }
        drained.len()
    }

    #[cfg(test)]
    pub fn current(&self, tab_id: TabId) -> Option<TaskId> {
        self.tasks.lock().get(&tab_id).map(|t| t.id)
    }

    pub fn is_active(&self, tab_id: TabId) -> bool {
        self.tasks.lock().contains_key(&tab_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_supersedes_previous_task() {
        let registry = TaskRegistry::new();
        let first = Task::new(1, "a", None, None);
        let first_token = first.token.clone();
        assert!(registry.register(first).is_none());

        let second = Task::new(1, "b", None, None);
        let second_id = second.id;
        let old = registry.register(second).unwrap();
        assert!(old.is_cancelled());
        assert!(first_token.is_cancelled());
        assert_eq!(registry.current(1), Some(second_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stale_finish_keeps_replacement() {
        let registry = TaskRegistry::new();
        let first = Task::new(1, "a", None, None);
        let first_id = first.id;
        registry.register(first);
        let second = Task::new(1, "b", None, None);
        let second_id = second.id;
        registry.register(second);

        assert!(!registry.finish(1, first_id));
        assert!(registry.is_active(1));
        assert!(registry.finish(1, second_id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cancel_and_cancel_all() {
        let registry = TaskRegistry::new();
        assert!(registry.cancel(9).is_none());

        let task = Task::new(9, "x", None, None);
        let token = task.token.clone();
        registry.register(task);
        assert!(registry.cancel(9).is_some());
        assert!(token.is_cancelled());
        assert!(!registry.is_active(9));

        let tokens: Vec<_> = (0..3)
            .map(|tab| {
                let task = Task::new(tab, "v", None, None);
                let token = task.token.clone();
                registry.register(task);
                token
            })
            .collect();
        assert_eq!(registry.cancel_all(), 3);
        assert!(tokens.iter().all(|t| t.is_cancelled()));
        assert!(registry.is_empty());
    }
}
