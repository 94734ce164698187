//! Presentation of the task collection.
//!
//! [`TaskListView`] is a pure function of a task slice: it either is the
//! empty branch or splits the tasks into an active and a completed
//! [`Section`], keeping the newest-first order of the collection. Rendering
//! to the terminal is done by [`View`] with prettytable.

use super::messages::Message;
use super::task::{Task, TaskId};
use crate::msg_print;
use prettytable::{format, Cell, Row, Table};

const STRIKETHROUGH: char = '\u{0336}';

/// What a user can do with a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIntent {
    Toggle(TaskId),
    Delete(TaskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Normal,
    /// Struck through and muted, used for completed tasks.
    StruckMuted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskItemView<'a> {
    pub task: &'a Task,
    /// 1-based position in the whole collection, as accepted by `toggle` and `delete`.
    pub position: usize,
    pub style: TextStyle,
}

impl<'a> TaskItemView<'a> {
    pub fn new(task: &'a Task, position: usize) -> Self {
        let style = if task.completed { TextStyle::StruckMuted } else { TextStyle::Normal };
        Self { task, position, style }
    }

    /// Exactly two intents: toggle, then delete.
    pub fn intents(&self) -> [ItemIntent; 2] {
        [ItemIntent::Toggle(self.task.id.clone()), ItemIntent::Delete(self.task.id.clone())]
    }

    pub fn checkbox(&self) -> &'static str {
        if self.task.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }

    /// The task text with its style applied.
    pub fn label(&self) -> String {
        match self.style {
            TextStyle::Normal => self.task.text.clone(),
            TextStyle::StruckMuted => strike(&self.task.text),
        }
    }

    fn style_spec(&self) -> &'static str {
        match self.style {
            TextStyle::Normal => "",
            TextStyle::StruckMuted => "FD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub items: Vec<TaskItemView<'a>>,
}

impl Section<'_> {
    pub fn label(&self) -> Message {
        match self.kind {
            SectionKind::Active => Message::ActiveSection(self.items.len()),
            SectionKind::Completed => Message::CompletedSection(self.items.len()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskListView<'a> {
    Empty,
    Partitioned { active: Section<'a>, completed: Section<'a> },
}

impl<'a> TaskListView<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        if tasks.is_empty() {
            return TaskListView::Empty;
        }
        let (completed, active): (Vec<_>, Vec<_>) = tasks
            .iter()
            .enumerate()
            .map(|(index, task)| TaskItemView::new(task, index + 1))
            .partition(|item| item.task.completed);

        TaskListView::Partitioned {
            active: Section { kind: SectionKind::Active, items: active },
            completed: Section { kind: SectionKind::Completed, items: completed },
        }
    }

    /// The sections worth showing: active first, empty ones left out.
    pub fn sections(&self) -> Vec<&Section<'a>> {
        match self {
            TaskListView::Empty => Vec::new(),
            TaskListView::Partitioned { active, completed } => [active, completed].into_iter().filter(|s| !s.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaskListView::Empty)
    }
}

/// Header line above the list.
pub fn summary(tasks: &[Task]) -> Message {
    if tasks.is_empty() {
        return Message::TasksSummaryEmpty;
    }
    Message::TasksSummary {
        completed: tasks.iter().filter(|task| task.completed).count(),
        total: tasks.len(),
    }
}

fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, STRIKETHROUGH]).collect()
}

pub struct View {}

impl View {
    /// Builds the table of one section.
    pub fn section(section: &Section) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        for item in &section.items {
            table.add_row(Row::new(vec![
                Cell::new(&format!("{}.", item.position)),
                Cell::new(item.checkbox()),
                Cell::new(&item.label()).style_spec(item.style_spec()),
            ]));
        }
        table
    }

    /// Prints the summary, then every non-empty section.
    pub fn tasks(tasks: &[Task]) {
        msg_print!(summary(tasks));
        match TaskListView::new(tasks) {
            TaskListView::Empty => msg_print!(Message::NoTasksYet, true),
            view => {
                for section in view.sections() {
                    msg_print!(format!("\n{}", section.label()));
                    View::section(section).printstd();
                }
            }
        }
    }
}
