//! Fragment Normalizer.
//!
//! Without a schema only the repairs that need no knowledge of the target
//! are made: plain groups without nested groups are flattened and blocks
//! holding several content units are split. With a schema the result is
//! well formed: every node of every forest is a block with one content unit
//! and at most one non-empty group.

use crate::model::{BlockId, ListAttrs, ListType};

use super::{Fragment, FragmentNode, Schema};

pub fn normalize(fragment: Fragment, schema: Option<&Schema>) -> Fragment {
    let before = fragment.0.len();
    let nodes = normalize_forest(fragment.0, schema);
    log::debug!(
        "normalized {before} pasted nodes into {} (schema: {})",
        nodes.len(),
        schema.is_some()
    );
    Fragment(nodes)
}

fn normalize_forest(nodes: Vec<FragmentNode>, schema: Option<&Schema>) -> Vec<FragmentNode> {
    let mut out: Vec<FragmentNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            FragmentNode::Block { id, items } => {
                out.extend(normalize_block(id, items, schema));
            }
            FragmentNode::Group { attrs, items } => {
                let items = normalize_forest(items, schema);
                if attrs.list_type == ListType::Group && !items.iter().any(has_child_group) {
                    log::trace!("flattening plain group of {} nodes", items.len());
                    out.extend(items);
                    continue;
                }
                let Some(schema) = schema else {
                    out.push(FragmentNode::Group { attrs, items });
                    continue;
                };
                if items.is_empty() {
                    continue;
                }
                let group = FragmentNode::Group { attrs, items };
                if attrs.list_type.is_list() {
                    if let Some(FragmentNode::Block { items: previous, .. }) = out.last_mut() {
                        if !previous.iter().any(FragmentNode::is_group) {
                            log::trace!("attaching orphan {attrs} group to the block before it");
                            previous.push(group);
                            continue;
                        }
                    }
                }
                out.push(FragmentNode::block(vec![schema.placeholder(), group]));
            }
            FragmentNode::Content(unit) => {
                let content = FragmentNode::Content(unit);
                out.push(match schema {
                    Some(_) => FragmentNode::block(vec![content]),
                    None => content,
                });
            }
            FragmentNode::Other { kind, items } => {
                let items = normalize_forest(items, schema);
                match schema {
                    Some(_) => {
                        log::trace!("dropping foreign {kind} wrapper");
                        out.extend(items);
                    }
                    None => out.push(FragmentNode::Other { kind, items }),
                }
            }
        }
    }
    if schema.is_some() {
        out = out.into_iter().map(unwrap_redundant_wrapper).collect();
    }
    out
}

/// Splits a block with several content units into one block per unit, the
/// block's group going to the last of them.
fn normalize_block(
    id: Option<BlockId>,
    items: Vec<FragmentNode>,
    schema: Option<&Schema>,
) -> Vec<FragmentNode> {
    let mut contents = Vec::new();
    let mut groups = Vec::new();
    let mut pending = items;
    while !pending.is_empty() {
        let mut deferred = Vec::new();
        for item in pending {
            match item {
                FragmentNode::Content(_) => contents.push(item),
                FragmentNode::Group { attrs, items } => {
                    let items = normalize_forest(items, schema);
                    if schema.is_some() && items.is_empty() {
                        continue;
                    }
                    groups.push(FragmentNode::Group { attrs, items });
                }
                FragmentNode::Other { kind, items } if schema.is_some() => {
                    log::trace!("dropping foreign {kind} wrapper inside a block");
                    deferred.extend(items);
                }
                FragmentNode::Other { kind, items } => {
                    contents.push(FragmentNode::Other {
                        kind,
                        items: normalize_forest(items, schema),
                    });
                }
                // A block directly inside a block contributes its content.
                FragmentNode::Block { items, .. } => deferred.extend(items),
            }
        }
        pending = deferred;
    }

    if let Some(schema) = schema {
        if groups.len() > 1 {
            groups = vec![merge_groups(groups)];
        }
        if contents.is_empty() {
            contents.push(schema.placeholder());
        }
    }

    if contents.len() <= 1 {
        let mut items = contents;
        items.extend(groups);
        return vec![FragmentNode::Block { id, items }];
    }

    log::trace!("splitting pasted block with {} content units", contents.len());
    let last = contents.len() - 1;
    contents
        .into_iter()
        .enumerate()
        .map(|(index, content)| {
            let mut items = vec![content];
            if index == last {
                items.append(&mut groups);
            }
            FragmentNode::block(items)
        })
        .collect()
}

/// Joins every group of one block into the last one, which keeps its attrs.
fn merge_groups(groups: Vec<FragmentNode>) -> FragmentNode {
    let mut merged = Vec::new();
    let mut last_attrs = None;
    for group in groups {
        if let FragmentNode::Group { attrs, items } = group {
            merged.extend(items);
            last_attrs = Some(attrs);
        }
    }
    FragmentNode::Group {
        attrs: last_attrs.unwrap_or_else(ListAttrs::group),
        items: merged,
    }
}

/// `Block("", Group[Block("", G)])` collapses to `Block("", G)`.
fn unwrap_redundant_wrapper(mut node: FragmentNode) -> FragmentNode {
    while let Some(inner) = redundant_inner(&node) {
        log::trace!("unwrapping empty wrapper block");
        node = inner;
    }
    node
}

fn redundant_inner(node: &FragmentNode) -> Option<FragmentNode> {
    let FragmentNode::Block { items, .. } = node else {
        return None;
    };
    if !has_empty_content(items) {
        return None;
    }
    let Some(FragmentNode::Group { attrs, items: inner }) =
        items.iter().find(|item| item.is_group())
    else {
        return None;
    };
    if attrs.list_type != ListType::Group {
        return None;
    }
    match inner.as_slice() {
        [FragmentNode::Block { items, .. }]
            if has_empty_content(items) && items.iter().any(FragmentNode::is_group) =>
        {
            inner.first().cloned()
        }
        _ => None,
    }
}

fn has_empty_content(items: &[FragmentNode]) -> bool {
    items.iter().any(|item| match item {
        FragmentNode::Content(unit) => unit.is_empty_text(),
        _ => false,
    })
}

fn has_child_group(node: &FragmentNode) -> bool {
    match node {
        FragmentNode::Block { items, .. } => items.iter().any(FragmentNode::is_group),
        FragmentNode::Group { .. } => true,
        FragmentNode::Content(_) => false,
        FragmentNode::Other { items, .. } => items.iter().any(has_child_group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentKind, ContentUnit};
    use crate::snapshot::outline_blocks;
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        Schema::default()
    }

    fn repaired(nodes: Vec<FragmentNode>) -> String {
        let blocks = normalize(Fragment::new(nodes), Some(&schema()))
            .into_blocks()
            .unwrap();
        outline_blocks(&blocks)
    }

    fn plain(items: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::group(ListAttrs::group(), items)
    }

    fn bullets(items: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::group(ListAttrs::unordered(1), items)
    }

    fn block_with_id(id: &str, items: Vec<FragmentNode>) -> FragmentNode {
        FragmentNode::Block {
            id: Some(BlockId::from(id)),
            items,
        }
    }

    #[test]
    fn test_bare_text_becomes_a_block() {
        insta::assert_snapshot!(repaired(vec![FragmentNode::paragraph("Hello")]), @r#"paragraph "Hello""#);
    }

    #[test]
    fn test_multi_content_block_is_split_and_ids_cleared() {
        let fragment = vec![block_with_id(
            "test",
            vec![
                FragmentNode::paragraph("First"),
                FragmentNode::paragraph("Second"),
                plain(vec![FragmentNode::text_block("Child")]),
            ],
        )];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "First"
        paragraph "Second"
          Group
            paragraph "Child"
        "#);
    }

    #[test]
    fn test_block_without_content_gets_placeholder() {
        let fragment = vec![FragmentNode::block(vec![plain(vec![
            FragmentNode::text_block("Child"),
        ])])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph ""
          Group
            paragraph "Child"
        "#);
    }

    #[test]
    fn test_placeholder_kind_follows_schema() {
        let schema = Schema {
            placeholder: ContentKind::Heading,
        };
        let fragment = Fragment::new(vec![bullets(vec![FragmentNode::text_block("Item")])]);

        let blocks = normalize(fragment, Some(&schema)).into_blocks().unwrap();

        assert_eq!(blocks[0].content, ContentUnit::empty(ContentKind::Heading));
    }

    #[test]
    fn test_plain_group_without_nesting_is_flattened() {
        let fragment = vec![plain(vec![
            block_with_id("a", vec![FragmentNode::paragraph("A")]),
            block_with_id("b", vec![FragmentNode::paragraph("B")]),
        ])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "A" #a
        paragraph "B" #b
        "#);
    }

    #[test]
    fn test_plain_group_with_nesting_is_wrapped() {
        let fragment = vec![plain(vec![
            block_with_id(
                "a",
                vec![
                    FragmentNode::paragraph("A"),
                    plain(vec![FragmentNode::text_block("C")]),
                ],
            ),
            block_with_id("b", vec![FragmentNode::paragraph("B")]),
        ])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph ""
          Group
            paragraph "A" #a
              Group
                paragraph "C"
            paragraph "B" #b
        "#);
    }

    #[test]
    fn test_orphan_list_is_wrapped() {
        let fragment = vec![bullets(vec![FragmentNode::text_block("Item")])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph ""
          Unordered(1)
            paragraph "Item"
        "#);
    }

    #[test]
    fn test_orphan_list_joins_previous_block() {
        let fragment = vec![
            block_with_id("a", vec![FragmentNode::paragraph("A")]),
            bullets(vec![FragmentNode::text_block("Item")]),
        ];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "A" #a
          Unordered(1)
            paragraph "Item"
        "#);
    }

    #[test]
    fn test_orphan_list_after_block_with_children_is_wrapped() {
        let fragment = vec![
            FragmentNode::block(vec![
                FragmentNode::paragraph("A"),
                bullets(vec![FragmentNode::text_block("One")]),
            ]),
            bullets(vec![FragmentNode::text_block("Two")]),
        ];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "A"
          Unordered(1)
            paragraph "One"
        paragraph ""
          Unordered(1)
            paragraph "Two"
        "#);
    }

    #[test]
    fn test_empty_wrapper_is_unwrapped() {
        let fragment = vec![plain(vec![FragmentNode::block(vec![
            FragmentNode::Content(ContentUnit::empty(ContentKind::Paragraph)),
            bullets(vec![FragmentNode::text_block("Item")]),
        ])])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph ""
          Unordered(1)
            paragraph "Item"
        "#);
    }

    #[test]
    fn test_foreign_wrappers_and_empty_groups_are_dropped() {
        let fragment = vec![FragmentNode::Other {
            kind: "div".to_string(),
            items: vec![
                FragmentNode::block(vec![FragmentNode::paragraph("A"), bullets(vec![])]),
                FragmentNode::paragraph("B"),
            ],
        }];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "A"
        paragraph "B"
        "#);
    }

    #[test]
    fn test_groups_of_one_block_are_merged() {
        let fragment = vec![FragmentNode::block(vec![
            FragmentNode::paragraph("A"),
            plain(vec![FragmentNode::text_block("One")]),
            bullets(vec![FragmentNode::text_block("Two")]),
        ])];

        insta::assert_snapshot!(repaired(fragment), @r#"
        paragraph "A"
          Unordered(1)
            paragraph "One"
            paragraph "Two"
        "#);
    }

    #[test]
    fn test_normalizing_twice_changes_nothing() {
        let fragment = Fragment::new(vec![
            FragmentNode::paragraph("loose"),
            plain(vec![FragmentNode::block(vec![
                FragmentNode::Content(ContentUnit::empty(ContentKind::Paragraph)),
                bullets(vec![FragmentNode::text_block("Item")]),
            ])]),
            FragmentNode::block(vec![
                FragmentNode::paragraph("x"),
                FragmentNode::paragraph("y"),
            ]),
            bullets(vec![FragmentNode::paragraph("bare item")]),
        ]);

        let once = normalize(fragment, Some(&schema()));
        let twice = normalize(once.clone(), Some(&schema()));

        assert_eq!(twice, once);
    }

    #[test]
    fn test_without_schema_orphans_pass_through() {
        let fragment = Fragment::new(vec![
            FragmentNode::paragraph("Hello"),
            bullets(vec![FragmentNode::text_block("Item")]),
        ]);

        let result = normalize(fragment.clone(), None);

        assert_eq!(result, fragment);
    }

    #[test]
    fn test_without_schema_plain_groups_still_flatten() {
        let fragment = Fragment::new(vec![plain(vec![
            FragmentNode::text_block("A"),
            FragmentNode::text_block("B"),
        ])]);

        let result = normalize(fragment, None);

        assert_eq!(
            result.nodes(),
            &[FragmentNode::text_block("A"), FragmentNode::text_block("B")]
        );
    }
}
