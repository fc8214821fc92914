use std::collections::VecDeque;

use crate::error::EditError;
use crate::model::{Document, ListLevel, ListType};
use crate::position::locate;
use crate::settings::EditorSettings;

use super::{
    ConvertOptions, Deferred, Edit, SplitOptions, Trigger, append_block, delete_block, merge,
    merge_forward, nest, relevel_children, split, split_into_section, unnest, update_group_type,
};

/// An edit intent, as dispatched by the host or scheduled by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Split { at: usize, options: SplitOptions },
    SplitIntoSection { at: usize },
    /// Join the block starting at `boundary` onto the one above it.
    Merge { boundary: usize },
    MergeForward { at: usize },
    Nest {
        at: usize,
        list_type: ListType,
        level: Option<ListLevel>,
    },
    Unnest { at: usize },
    UpdateGroup {
        at: usize,
        list_type: ListType,
        options: ConvertOptions,
    },
    RelevelChildren { at: usize, base: u8, indent: bool },
    DeleteBlock { at: usize },
    AppendBlock,
}

impl Command {
    pub fn apply(&self, doc: &Document, settings: &EditorSettings) -> Result<Edit, EditError> {
        let mut edit = match self {
            Command::Split { at, options } => split(doc, *at, options.clone()),
            Command::SplitIntoSection { at } => split_into_section(doc, *at),
            Command::Merge { boundary } => merge(doc, *boundary),
            Command::MergeForward { at } => merge_forward(doc, *at),
            Command::Nest {
                at,
                list_type,
                level,
            } => nest(doc, *at, *list_type, *level),
            Command::Unnest { at } => unnest(doc, *at),
            Command::UpdateGroup {
                at,
                list_type,
                options,
            } => update_group_type(doc, *at, *list_type, *options),
            Command::RelevelChildren { at, base, indent } => {
                relevel_children(doc, *at, *base, *indent)
            }
            Command::DeleteBlock { at } => delete_block(doc, *at),
            Command::AppendBlock => append_block(doc),
        }?;

        if !settings.relevel_on_indent
            && matches!(
                edit.deferred,
                Some(Deferred {
                    command: Command::RelevelChildren { .. },
                    ..
                })
            )
        {
            edit.deferred = None;
        }
        Ok(edit)
    }
}

/// A unit of work waiting in a [`CommandQueue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Immediate(Command),
    Deferred(Deferred),
}

/// What a dispatched command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// A new revision was produced.
    Applied { selection: Option<usize> },
    /// The command was valid but had nothing to change.
    Unchanged,
    /// The command did not apply; the host should run its default behavior.
    FellThrough(EditError),
}

impl Dispatch {
    #[must_use]
    pub fn took_effect(&self) -> bool {
        matches!(self, Dispatch::Applied { .. })
    }
}

/// Host-side driver holding the current document and the steps still to run.
///
/// Commands dispatched directly apply at once. Deferred halves of two-phase
/// edits wait for the next [`tick`](Self::tick) and only run if the document
/// is still at the revision they were scheduled against.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    doc: Document,
    selection: Option<usize>,
    pending: VecDeque<Step>,
    settings: EditorSettings,
}

impl CommandQueue {
    pub fn new(doc: Document, settings: EditorSettings) -> Self {
        Self {
            doc,
            selection: None,
            pending: VecDeque::new(),
            settings,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn set_selection(&mut self, pos: usize) {
        self.selection = Some(pos);
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn pending(&self) -> impl Iterator<Item = &Step> {
        self.pending.iter()
    }

    /// Queues a step for the next tick.
    pub fn submit(&mut self, step: Step) {
        self.pending.push_back(step);
    }

    /// Applies `command` now.
    ///
    /// Recoverable failures come back as [`Dispatch::FellThrough`] with the
    /// document untouched. A broken invariant is returned as an error.
    pub fn dispatch(&mut self, command: Command) -> Result<Dispatch, EditError> {
        match command.apply(&self.doc, &self.settings) {
            Ok(edit) => Ok(self.accept(edit)),
            Err(err) if err.is_recoverable() => {
                log::debug!("{command:?} fell through: {err}");
                Ok(Dispatch::FellThrough(err))
            }
            Err(err) => Err(err),
        }
    }

    /// Splits at the current selection.
    ///
    /// With the cursor at the very start of a block the kind and attributes
    /// are kept on both halves, unless disabled in the settings.
    pub fn split_at_cursor(&mut self) -> Result<Dispatch, EditError> {
        let Some(pos) = self.selection else {
            return Ok(Dispatch::FellThrough(EditError::NotABlock { pos: 0 }));
        };
        let at_start = locate(&self.doc, pos).is_ok_and(|info| info.text_start() == pos);
        let options = if at_start && self.settings.keep_type_at_block_start {
            SplitOptions::keeping_type()
        } else {
            SplitOptions::default()
        };
        self.dispatch(Command::Split { at: pos, options })
    }

    /// Runs the steps queued before this call. Steps queued while running
    /// wait for the following tick. Returns how many steps took effect.
    pub fn tick(&mut self) -> Result<usize, EditError> {
        let mut applied = 0;
        for step in std::mem::take(&mut self.pending) {
            let command = match step {
                Step::Immediate(command) => command,
                Step::Deferred(Deferred {
                    command,
                    trigger: Trigger::Revision(revision),
                }) => {
                    if revision != self.doc.revision() {
                        log::warn!(
                            "dropping stale {command:?}: scheduled for revision {revision}, document is at {}",
                            self.doc.revision()
                        );
                        continue;
                    }
                    log::debug!("running deferred {command:?} at revision {revision}");
                    command
                }
            };
            if self.dispatch(command)?.took_effect() {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Ticks until nothing is left to run.
    pub fn run_until_idle(&mut self) -> Result<usize, EditError> {
        let mut applied = 0;
        while !self.pending.is_empty() {
            applied += self.tick()?;
        }
        Ok(applied)
    }

    fn accept(&mut self, edit: Edit) -> Dispatch {
        let changed = edit.doc.revision() != self.doc.revision();
        self.doc = edit.doc;
        if edit.selection.is_some() {
            self.selection = edit.selection;
        }
        if let Some(deferred) = edit.deferred {
            self.pending.push_back(Step::Deferred(deferred));
        }
        if changed {
            Dispatch::Applied {
                selection: edit.selection,
            }
        } else {
            Dispatch::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockSpec, GroupSpec};
    use crate::snapshot::outline;
    use pretty_assertions::assert_eq;

    fn queue(blocks: Vec<BlockSpec>) -> CommandQueue {
        CommandQueue::new(
            Document::from_blocks(blocks).unwrap(),
            EditorSettings::default(),
        )
    }

    fn at(queue: &CommandQueue, id: &str) -> usize {
        queue.document().pos_in_block(&id.into()).unwrap()
    }

    fn bulleted_with_grandchild() -> Vec<BlockSpec> {
        vec![BlockSpec::text("P").with_children(GroupSpec::unordered(
            1,
            vec![
                BlockSpec::text("A"),
                BlockSpec::text("B")
                    .with_id("b")
                    .with_children(GroupSpec::unordered(1, vec![BlockSpec::text("X")])),
            ],
        ))]
    }

    #[test]
    fn test_nest_relevels_on_next_tick() {
        let mut queue = queue(bulleted_with_grandchild());
        let pos = at(&queue, "b");

        let dispatched = queue
            .dispatch(Command::Nest {
                at: pos,
                list_type: ListType::Unordered,
                level: None,
            })
            .unwrap();

        assert!(dispatched.took_effect());
        assert_eq!(queue.pending().count(), 1);
        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          paragraph "P"
            Unordered(1)
              paragraph "A"
                Unordered(2)
                  paragraph "B" #b
                    Unordered(1)
                      paragraph "X"
        "#);

        assert_eq!(queue.tick().unwrap(), 1);

        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          paragraph "P"
            Unordered(1)
              paragraph "A"
                Unordered(2)
                  paragraph "B" #b
                    Unordered(3)
                      paragraph "X"
        "#);
    }

    #[test]
    fn test_stale_deferred_step_is_dropped() {
        let mut queue = queue(bulleted_with_grandchild());
        let pos = at(&queue, "b");
        queue
            .dispatch(Command::Nest {
                at: pos,
                list_type: ListType::Unordered,
                level: None,
            })
            .unwrap();
        queue.dispatch(Command::AppendBlock).unwrap();
        let before = queue.document().clone();

        assert_eq!(queue.tick().unwrap(), 0);

        assert_eq!(queue.document(), &before);
        assert_eq!(queue.pending().count(), 0);
    }

    #[test]
    fn test_relevel_can_be_disabled() {
        let mut queue = CommandQueue::new(
            Document::from_blocks(bulleted_with_grandchild()).unwrap(),
            EditorSettings {
                relevel_on_indent: false,
                ..EditorSettings::default()
            },
        );
        let pos = at(&queue, "b");

        queue
            .dispatch(Command::Nest {
                at: pos,
                list_type: ListType::Unordered,
                level: None,
            })
            .unwrap();

        assert_eq!(queue.pending().count(), 0);
    }

    #[test]
    fn test_recoverable_error_falls_through() {
        let mut queue = queue(vec![BlockSpec::text("A").with_id("a")]);
        let pos = at(&queue, "a");
        let before = queue.document().clone();

        let dispatched = queue.dispatch(Command::Unnest { at: pos }).unwrap();

        assert_eq!(dispatched, Dispatch::FellThrough(EditError::NotNested));
        assert!(!dispatched.took_effect());
        assert_eq!(queue.document(), &before);
    }

    #[test]
    fn test_no_op_is_reported_as_unchanged() {
        let mut queue = queue(vec![BlockSpec::text("P").with_children(GroupSpec::ordered(
            1,
            vec![BlockSpec::text("A").with_id("a")],
        ))]);
        let pos = at(&queue, "a");

        let dispatched = queue
            .dispatch(Command::UpdateGroup {
                at: pos,
                list_type: ListType::Ordered,
                options: ConvertOptions::default(),
            })
            .unwrap();

        assert_eq!(dispatched, Dispatch::Unchanged);
    }

    #[test]
    fn test_submitted_steps_run_in_order() {
        let mut queue = queue(vec![
            BlockSpec::text("A"),
            BlockSpec::text("B").with_id("b"),
        ]);
        let pos = at(&queue, "b");
        queue.submit(Step::Immediate(Command::Nest {
            at: pos,
            list_type: ListType::Group,
            level: None,
        }));
        queue.submit(Step::Immediate(Command::AppendBlock));

        assert_eq!(queue.run_until_idle().unwrap(), 2);

        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          paragraph "A"
            Group
              paragraph "B" #b
          paragraph ""
        "#);
    }

    #[test]
    fn test_tab_conversion_completes_after_ticks() {
        let mut queue = queue(vec![BlockSpec::text("P").with_children(GroupSpec::unordered(
            1,
            vec![BlockSpec::text("A"), BlockSpec::text("B").with_id("b")],
        ))]);
        let pos = at(&queue, "b");

        queue
            .dispatch(Command::UpdateGroup {
                at: pos,
                list_type: ListType::Ordered,
                options: ConvertOptions {
                    tab: true,
                    ..ConvertOptions::default()
                },
            })
            .unwrap();
        queue.run_until_idle().unwrap();

        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          paragraph "P"
            Unordered(1)
              paragraph "A"
                Ordered(1)
                  paragraph "B" #b
        "#);
        assert_eq!(queue.selection(), Some(at(&queue, "b")));
    }

    #[test]
    fn test_split_at_block_start_keeps_heading() {
        let mut heading = BlockSpec::text("Title").with_id("h");
        heading.content.kind = crate::model::ContentKind::Heading;
        let mut queue = queue(vec![heading]);
        let pos = at(&queue, "h");
        queue.set_selection(pos);

        queue.split_at_cursor().unwrap();

        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          heading "" #h
          heading "Title"
        "#);
    }

    #[test]
    fn test_split_mid_block_starts_a_paragraph() {
        let mut heading = BlockSpec::text("Title").with_id("h");
        heading.content.kind = crate::model::ContentKind::Heading;
        let mut queue = queue(vec![heading]);
        let pos = at(&queue, "h") + 2;
        queue.set_selection(pos);

        queue.split_at_cursor().unwrap();

        insta::assert_snapshot!(outline(queue.document()), @r#"
        Group
          heading "Ti" #h
          paragraph "tle"
        "#);
    }
}
