//! Flat content map of the course outline.

use crate::scorm::structure::Item;
use serde::Serialize;

/// Separator between ancestor titles in a row path.
pub const PATH_SEPARATOR: &str = " -> ";

/// One launchable node of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentMapRow {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "File")]
    pub file: String,
    #[serde(rename = "Identifier")]
    pub identifier: String,
}

/// Flatten an outline in pre-order, emitting a row for every item that
/// resolves to a file. Folder items only contribute their title to the
/// paths of their descendants.
pub fn flatten(items: &[Item]) -> Vec<ContentMapRow> {
    let mut rows = Vec::new();
    // (item, path of its parent); children pushed in reverse to keep document order
    let mut stack: Vec<(&Item, Option<String>)> =
        items.iter().rev().map(|item| (item, None)).collect();

    while let Some((item, parent_path)) = stack.pop() {
        let path = match parent_path {
            Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, item.title),
            None => item.title.clone(),
        };

        if let Some(file) = &item.resource_href {
            rows.push(ContentMapRow {
                path: path.clone(),
                file: file.clone(),
                identifier: item.identifier.clone(),
            });
        }

        stack.extend(
            item.sub_items
                .iter()
                .rev()
                .map(|child| (child, Some(path.clone()))),
        );
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_item() {
        let rows = flatten(&[Item::new("I1", "Intro").with_href("content/index.html")]);
        assert_eq!(
            rows,
            vec![ContentMapRow {
                path: "Intro".to_string(),
                file: "content/index.html".to_string(),
                identifier: "I1".to_string(),
            }]
        );
    }

    #[test]
    fn test_folders_prefix_paths() {
        let outline = vec![
            Item::new("M1", "Module 1").with_children(vec![
                Item::new("L1", "Lesson 1").with_href("l1.html"),
                Item::new("S", "Section").with_children(vec![Item::new("L2", "Lesson 2").with_href("l2.html")]),
            ]),
            Item::new("Q", "Quiz").with_href("quiz.html"),
        ];

        let paths: Vec<_> = flatten(&outline).into_iter().map(|row| row.path).collect();
        assert_eq!(
            paths,
            vec![
                "Module 1 -> Lesson 1",
                "Module 1 -> Section -> Lesson 2",
                "Quiz"
            ]
        );
    }

    #[test]
    fn test_file_bearing_parent_emits_before_children() {
        let outline = vec![Item::new("P", "Parent")
            .with_href("p.html")
            .with_children(vec![Item::new("C", "Child").with_href("c.html")])];

        let rows = flatten(&outline);
        assert_eq!(rows[0].identifier, "P");
        assert_eq!(rows[1].path, "Parent -> Child");
    }

    #[test]
    fn test_empty_outline() {
        assert!(flatten(&[]).is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn item_strategy() -> impl Strategy<Value = Item> {
            let leaf = ("[A-Z][0-9]{0,3}", "[a-z]{1,6}", proptest::option::of("[a-z]{1,6}\\.html"))
                .prop_map(|(id, title, href)| Item {
                    identifier: id,
                    title,
                    resource_href: href,
                    sub_items: Vec::new(),
                });

            leaf.prop_recursive(4, 32, 4, |inner| {
                (
                    "[A-Z][0-9]{0,3}",
                    "[a-z]{1,6}",
                    proptest::option::of("[a-z]{1,6}\\.html"),
                    prop::collection::vec(inner, 0..4),
                )
                    .prop_map(|(id, title, href, children)| Item {
                        identifier: id,
                        title,
                        resource_href: href,
                        sub_items: children,
                    })
            })
        }

        fn preorder<'a>(items: &'a [Item], prefix: &str, out: &mut Vec<(String, &'a str, &'a str)>) {
            for item in items {
                let path = if prefix.is_empty() {
                    item.title.clone()
                } else {
                    format!("{}{}{}", prefix, PATH_SEPARATOR, item.title)
                };
                if let Some(file) = &item.resource_href {
                    out.push((path.clone(), item.identifier.as_str(), file.as_str()));
                }
                preorder(&item.sub_items, &path, out);
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_rows_match_filtered_preorder(items in prop::collection::vec(item_strategy(), 0..5)) {
                let mut expected = Vec::new();
                preorder(&items, "", &mut expected);

                let rows = flatten(&items);
                prop_assert_eq!(rows.len(), expected.len());
                for (row, (path, identifier, file)) in rows.iter().zip(&expected) {
                    prop_assert_eq!(&row.path, path);
                    prop_assert_eq!(row.identifier.as_str(), *identifier);
                    prop_assert_eq!(row.file.as_str(), *file);
                }
            }
        }
    }
}
