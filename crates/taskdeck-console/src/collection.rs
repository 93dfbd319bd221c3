/*
[INPUT]:  Tasks received from the task service
[OUTPUT]: Ordered task list with id lookup and in-place merge
[POS]:    Store internals - the task collection itself
[UPDATE]: When merge or ordering rules change
*/

use std::collections::HashMap;

use taskdeck_adapter::Task;

/// Where a merged task landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An entry with the same id was replaced at this position
    Replaced(usize),
    /// The task was new and appended at this position
    Appended(usize),
}

/// Tasks in server order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(tasks);
        collection
    }

    /// Swap in a fresh server result, keeping server order. A repeated id
    /// keeps the first position and the last copy.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = Vec::with_capacity(tasks.len());
        self.index.clear();
        for task in tasks {
            self.upsert(task);
        }
    }

    /// Replace the entry with the same id in place, or append.
    pub fn upsert(&mut self, task: Task) -> MergeOutcome {
        match self.index.get(&task.id).copied() {
            Some(position) => {
                self.tasks[position] = task;
                MergeOutcome::Replaced(position)
            }
            None => {
                let position = self.tasks.len();
                self.index.insert(task.id.clone(), position);
                self.tasks.push(task);
                MergeOutcome::Appended(position)
            }
        }
    }

    /// Remove the entry with this id, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let position = self.index.remove(id)?;
        let removed = self.tasks.remove(position);
        self.reindex_from(position);
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&position| &self.tasks[position])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    fn reindex_from(&mut self, start: usize) {
        if start == 0 {
            self.index.clear();
        }
        for (position, task) in self.tasks.iter().enumerate().skip(start) {
            self.index.insert(task.id.clone(), position);
        }
    }
}
