//! Group Conversion Engine.

use crate::classify::{GroupInfo, group_info, satisfies};
use crate::error::EditError;
use crate::model::{BlockIx, Document, ListAttrs, ListLevel, ListType};
use crate::position::locate;

use super::{Command, Edit, nest};

/// How a conversion was requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Requested from an indent gesture: sink plainly first, convert after.
    pub tab: bool,
    /// Requested from a "turn into" menu: rewrite the group in place.
    pub turn_into: bool,
    /// Second phase of a sink-then-convert pair; set by the engine itself.
    pub after_sink: bool,
}

/// Changes the list type of the group holding the block at `pos`.
///
/// In order:
/// 1. nothing happens when the group already has the requested type
/// 2. a list turned into `Group` is rewritten in place
/// 3. a block other than the first is nested under its previous sibling in
///    a new group of the requested type (always the case in the root group,
///    whose own type never changes)
/// 4. from an indent gesture, switching an item of a multi-block list to
///    another list type first sinks the block plainly under its previous
///    sibling, then converts its new group in a deferred step
/// 5. otherwise the group is rewritten in place, one level deeper than an
///    enclosing list of the same type; a plain group becoming a list also
///    schedules [`Command::RelevelChildren`]
pub fn update_group_type(
    doc: &Document,
    pos: usize,
    list_type: ListType,
    options: ConvertOptions,
) -> Result<Edit, EditError> {
    let info = group_info(doc, pos)?;
    let current = info.attrs.list_type;

    if current == list_type || (options.after_sink && satisfies(current, list_type)) {
        return Ok(Edit::unchanged(doc, pos));
    }

    if current.is_list() && list_type == ListType::Group {
        log::debug!("turning {} group back into a plain group", info.attrs);
        return rewrite(doc, &info, ListAttrs::group(), pos);
    }

    if info.is_root() {
        if info.container.is_first_child() {
            return Err(EditError::NoPreviousSibling);
        }
        return nest(doc, pos, list_type, Some(ListLevel::MIN));
    }

    if !info.container.is_first_child() && !options.tab && !options.after_sink {
        return nest(doc, pos, list_type, Some(ListLevel::MIN));
    }

    if current.is_list()
        && options.tab
        && !info.container.is_first_child()
        && !options.turn_into
        && !options.after_sink
        && info.block_count(doc) > 1
    {
        let sunk = nest(doc, pos, ListType::Group, Some(ListLevel::MIN))?;
        let at = sunk.selection.unwrap_or(pos);
        return Ok(sunk.then(Command::UpdateGroup {
            at,
            list_type,
            options: ConvertOptions {
                after_sink: true,
                ..options
            },
        }));
    }

    let level = match info.parent_attrs {
        Some(parent) if parent.list_type == list_type => parent.level.deeper(),
        _ => ListLevel::MIN,
    };
    let attrs = ListAttrs::new(list_type, level);
    let edit = rewrite(doc, &info, attrs, pos)?;
    if current.is_list() || !list_type.is_list() {
        return Ok(edit);
    }
    let base = if list_type == ListType::Unordered {
        level.get()
    } else {
        0
    };
    Ok(edit.then(Command::RelevelChildren {
        at: info.container.block_bounds.before,
        base,
        indent: true,
    }))
}

fn rewrite(
    doc: &Document,
    info: &GroupInfo,
    attrs: ListAttrs,
    pos: usize,
) -> Result<Edit, EditError> {
    let mut tx = doc.clone();
    tx.group_mut(info.group).attrs = attrs;
    log::debug!("group of block {:?} is now {attrs}", info.container.id);
    Edit::commit(tx, Some(pos))
}

/// Recomputes the level of every bulleted group below the block at `pos`
/// and below each of its following siblings.
///
/// A group owned directly by one of those blocks gets `base` (plus one when
/// `indent` is set); each further level of nesting adds one more. Levels
/// saturate at [`ListLevel::MAX`]. The cursor is left where it was.
pub fn relevel_children(
    doc: &Document,
    pos: usize,
    base: u8,
    indent: bool,
) -> Result<Edit, EditError> {
    let info = locate(doc, pos)?;
    let group = info.group();
    let siblings = doc.group(group).blocks[info.index()..].to_vec();

    let mut tx = doc.clone();
    let mut changed = 0;
    let offset = base as usize + usize::from(indent);
    for block in siblings {
        relevel_subtree(&mut tx, block, offset, &mut changed);
    }
    if changed == 0 {
        return Ok(Edit {
            selection: None,
            ..Edit::unchanged(doc, pos)
        });
    }
    log::debug!("releveled {changed} bulleted groups");
    Edit::commit(tx, None)
}

fn relevel_subtree(tx: &mut Document, block: BlockIx, level: usize, changed: &mut usize) {
    let Some(group) = tx.block(block).children else {
        return;
    };
    let attrs = tx.group(group).attrs;
    if attrs.list_type == ListType::Unordered {
        let next = ListLevel::clamped(level);
        if next != attrs.level {
            tx.group_mut(group).attrs.level = next;
            *changed += 1;
        }
    }
    for child in tx.group(group).blocks.clone() {
        relevel_subtree(tx, child, level + 1, changed);
    }
}
