use std::collections::HashSet;

use crate::config::GraphConfig;
use crate::error::{Result, WikigraphError};
use crate::query::ids::{is_entity_uri, is_http_url, is_media_uri, is_property_id, trailing_segment};
use crate::query::{Entity, Property};

use super::{GraphEdge, GraphNode, KindClassifier, KnowledgeGraph, NodeKind};

/// What a single property row turns into
enum Spoke {
    /// Reference to another entity
    Relation { target: String, kind: NodeKind },
    /// Media file or image URL
    Media { id: String },
}

/// Builds the one-hop graph around an entity
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    excluded: HashSet<String>,
    label_max_chars: usize,
    classifier: KindClassifier,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

impl GraphBuilder {
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            excluded: config.excluded_properties.iter().cloned().collect(),
            label_max_chars: config.label_max_chars,
            classifier: KindClassifier::new(config.kind_rules.clone()),
        }
    }

    pub fn with_classifier(mut self, classifier: KindClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Build the graph for `entity` with at most `max_relations` edges.
    ///
    /// Properties are inspected in order, up to `2 * max_relations` of them
    /// (excluded ids included in that window). Literals and other
    /// non-relational values are skipped and do not count toward the cap.
    pub fn build(&self, entity: &Entity, max_relations: usize) -> Result<KnowledgeGraph> {
        if entity.id.trim().is_empty() {
            return Err(WikigraphError::GraphBuild(format!(
                "entity '{}' has no identifier",
                entity.label
            )));
        }

        let mut graph = KnowledgeGraph::hub_only(&entity.id, &entity.label);
        if entity.properties.is_empty() || max_relations == 0 {
            return Ok(graph);
        }

        let mut relations = 0usize;
        let mut media_counter = 0usize;

        for prop in entity.properties.iter().take(max_relations.saturating_mul(2)) {
            if self.excluded.contains(&prop.id) {
                continue;
            }

            let Some(spoke) = self.classify(prop, &mut media_counter) else {
                continue;
            };

            let (target, node) = match spoke {
                Spoke::Relation { target, kind } => {
                    let node = GraphNode {
                        id: target.clone(),
                        label: prop.value.clone(),
                        kind,
                        image_url: None,
                    };
                    (target, node)
                }
                Spoke::Media { id } => {
                    let node = GraphNode {
                        id: id.clone(),
                        label: truncate_label(&prop.value, self.label_max_chars),
                        kind: NodeKind::Image,
                        image_url: Some(prop.raw_value.clone()),
                    };
                    (id, node)
                }
            };

            if target != entity.id {
                // a repeated target takes the latest label and kind in place
                match graph.nodes.iter_mut().find(|n| n.id == target) {
                    Some(existing) => *existing = node,
                    None => graph.nodes.push(node),
                }
            }
            graph.edges.push(GraphEdge::new(&entity.id, &target, &edge_label(prop)));

            relations += 1;
            if relations >= max_relations {
                break;
            }
        }

        log::debug!(
            "Built graph for {}: {} nodes, {} edges",
            entity.id,
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    /// Build, degrading to the hub-only graph on failure
    pub fn build_or_hub(&self, entity: &Entity, max_relations: usize) -> KnowledgeGraph {
        self.build(entity, max_relations).unwrap_or_else(|e| {
            log::warn!("Graph unavailable for {}: {}", entity.id, e);
            KnowledgeGraph::hub_only(&entity.id, &entity.label)
        })
    }

    fn classify(&self, prop: &Property, media_counter: &mut usize) -> Option<Spoke> {
        let raw = prop.raw_value.as_str();

        if is_entity_uri(raw) {
            let target = trailing_segment(raw);
            if target.is_empty() {
                log::debug!("Skipping {}: entity URI without id ({})", prop.id, raw);
                return None;
            }
            return Some(Spoke::Relation {
                target: target.to_string(),
                kind: self.classifier.classify(&prop.label),
            });
        }

        let is_image_url = prop.label.to_lowercase().contains("image") && is_http_url(raw);
        if is_media_uri(raw) || is_image_url {
            let id = match media_file_id(raw) {
                Some(id) => id,
                None => {
                    let id = format!("media_{}", media_counter);
                    *media_counter += 1;
                    id
                }
            };
            return Some(Spoke::Media { id });
        }

        None
    }
}

/// `File:<name>` with underscores as spaces, if the URI names a file page
fn media_file_id(raw: &str) -> Option<String> {
    let (_, rest) = raw.split_once("File:")?;
    let name = rest.split('?').next().unwrap_or(rest).replace('_', " ");
    if name.is_empty() {
        return None;
    }
    Some(format!("File:{}", name))
}

fn edge_label(prop: &Property) -> String {
    if is_property_id(&prop.id) {
        format!("Property:{}", prop.id)
    } else {
        prop.label.clone()
    }
}

/// Cap `label` at `max_chars` characters, ellipsis included
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::KindRule;

    fn prop(id: &str, label: &str, value: &str, raw: &str) -> Property {
        Property {
            id: id.to_string(),
            label: label.to_string(),
            value: value.to_string(),
            raw_value: raw.to_string(),
        }
    }

    fn entity_ref(id: &str, label: &str, target: &str) -> Property {
        prop(
            id,
            label,
            &format!("label of {}", target),
            &format!("http://www.wikidata.org/entity/{}", target),
        )
    }

    fn entity(properties: Vec<Property>) -> Entity {
        Entity {
            id: "Q1".to_string(),
            label: "Main".to_string(),
            description: String::new(),
            properties,
        }
    }

    fn assert_well_formed(graph: &KnowledgeGraph) {
        let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids.len(), graph.nodes.len(), "node ids must be unique");
        for edge in &graph.edges {
            assert!(ids.contains(edge.source.as_str()));
            assert!(ids.contains(edge.target.as_str()));
        }
        assert_eq!(graph.nodes.iter().filter(|n| n.kind == NodeKind::Main).count(), 1);
    }

    #[test]
    fn test_single_relation() {
        let e = entity(vec![prop(
            "P106",
            "occupation",
            "politician",
            "http://www.wikidata.org/entity/Q82955",
        )]);
        let graph = GraphBuilder::default().build(&e, 15).unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].id, "Q1");
        assert_eq!(graph.nodes[0].kind, NodeKind::Main);
        assert_eq!(graph.nodes[1].id, "Q82955");
        assert_eq!(graph.nodes[1].label, "politician");
        assert_eq!(graph.nodes[1].kind, NodeKind::Related);
        assert_eq!(
            graph.edges,
            vec![GraphEdge::new("Q1", "Q82955", "Property:P106")]
        );
        assert_well_formed(&graph);
    }

    #[test]
    fn test_no_properties_yields_hub() {
        let graph = GraphBuilder::default().build(&entity(Vec::new()), 15).unwrap();
        assert_eq!(graph, KnowledgeGraph::hub_only("Q1", "Main"));
    }

    #[test]
    fn test_excluded_properties_never_appear() {
        let e = entity(vec![
            entity_ref("P31", "instance of", "Q5"),
            entity_ref("P21", "sex or gender", "Q6581097"),
            entity_ref("P27", "country of citizenship", "Q145"),
        ]);
        let graph = GraphBuilder::default().build(&e, 15).unwrap();
        assert!(!graph.contains_node("Q5"));
        assert!(!graph.contains_node("Q6581097"));
        assert!(graph.edges.iter().all(|e| e.label != "Property:P31" && e.label != "Property:P21"));
        assert_eq!(graph.node("Q145").unwrap().kind, NodeKind::Location);
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn test_edge_cap() {
        let props: Vec<_> = (0..20)
            .map(|i| entity_ref("P50", "author", &format!("Q{}", 100 + i)))
            .collect();
        let graph = GraphBuilder::default().build(&entity(props), 5).unwrap();
        assert_eq!(graph.edges.len(), 5);
        assert_eq!(graph.nodes.len(), 6);
        assert!(graph.nodes[1..].iter().all(|n| n.kind == NodeKind::Person));
        assert_well_formed(&graph);
    }

    #[test]
    fn test_inspection_window_is_twice_the_cap() {
        // 4 literals fill the 2 * 2 window; the reference after them is never seen
        let mut props: Vec<_> = (0..4)
            .map(|i| prop("P569", "date of birth", "1952", &format!("195{}", i)))
            .collect();
        props.push(entity_ref("P106", "occupation", "Q36180"));
        let graph = GraphBuilder::default().build(&entity(props), 2).unwrap();
        assert!(graph.edges.is_empty());
        assert_eq!(graph.nodes.len(), 1);
    }

    #[test]
    fn test_literals_do_not_count() {
        let props = vec![
            prop("P569", "date of birth", "1952-03-11", "1952-03-11T00:00:00Z"),
            prop("P856", "official website", "https://example.org", "https://example.org"),
            entity_ref("P106", "occupation", "Q36180"),
        ];
        let graph = GraphBuilder::default().build(&entity(props), 1).unwrap();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].target, "Q36180");
    }

    #[test]
    fn test_shared_target_one_node_two_edges() {
        let props = vec![
            entity_ref("P19", "place of birth", "Q350"),
            entity_ref("P20", "place of death", "Q350"),
        ];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].label, "Property:P19");
        assert_eq!(graph.edges[1].label, "Property:P20");
        assert_well_formed(&graph);
    }

    #[test]
    fn test_shared_target_takes_latest_label_and_kind() {
        let props = vec![
            prop("P19", "place of birth", "Cambridge", "http://www.wikidata.org/entity/Q350"),
            entity_ref("P27", "country of citizenship", "Q145"),
            prop("P50", "author", "Cambridge (person)", "http://www.wikidata.org/entity/Q350"),
        ];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();

        // position is kept from the first occurrence
        assert_eq!(graph.nodes[1].id, "Q350");
        assert_eq!(graph.nodes[1].kind, NodeKind::Person);
        assert_eq!(graph.nodes[1].label, "Cambridge (person)");
        assert_eq!(graph.nodes[2].id, "Q145");
        assert_eq!(graph.edges.len(), 3);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_self_reference_keeps_main_node() {
        let props = vec![entity_ref("P1889", "different from", "Q1")];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].kind, NodeKind::Main);
        assert_eq!(graph.edges.len(), 1);
        assert_well_formed(&graph);
    }

    #[test]
    fn test_commons_file_node() {
        let props = vec![prop(
            "P18",
            "image",
            "Example.jpg",
            "http://commons.wikimedia.org/wiki/File:Example.jpg",
        )];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        let node = graph.node("File:Example.jpg").unwrap();
        assert_eq!(node.kind, NodeKind::Image);
        assert_eq!(
            node.image_url.as_deref(),
            Some("http://commons.wikimedia.org/wiki/File:Example.jpg")
        );
    }

    #[test]
    fn test_commons_file_underscores_and_query() {
        let props = vec![prop(
            "P18",
            "image",
            "pic",
            "https://commons.wikimedia.org/wiki/File:Big_Ben_2012.jpg?uselang=en",
        )];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        assert!(graph.contains_node("File:Big Ben 2012.jpg"));
    }

    #[test]
    fn test_media_without_file_segment_uses_counter() {
        let props = vec![
            prop(
                "P18",
                "image",
                "a",
                "http://commons.wikimedia.org/wiki/Special:FilePath/A.jpg",
            ),
            prop("P4291", "panoramic image", "b", "https://example.org/b.png"),
        ];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        assert!(graph.contains_node("media_0"));
        assert!(graph.contains_node("media_1"));
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_image_label_truncated() {
        let long = "A very long file name that keeps on going.jpg";
        let props = vec![prop(
            "P18",
            "image",
            long,
            "http://commons.wikimedia.org/wiki/File:Long.jpg",
        )];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        let label = &graph.node("File:Long.jpg").unwrap().label;
        assert_eq!(label.chars().count(), 30);
        assert!(label.ends_with("..."));
    }

    #[test]
    fn test_truncate_label_boundaries() {
        assert_eq!(truncate_label("short", 30), "short");
        assert_eq!(truncate_label(&"x".repeat(30), 30), "x".repeat(30));
        assert_eq!(truncate_label("ééééé", 4), "é...");
    }

    #[test]
    fn test_non_property_id_uses_label() {
        let props = vec![entity_ref("rdfs-seeAlso", "see also", "Q9")];
        let graph = GraphBuilder::default().build(&entity(props), 15).unwrap();
        assert_eq!(graph.edges[0].label, "see also");
    }

    #[test]
    fn test_custom_classifier_order() {
        let builder = GraphBuilder::default().with_classifier(KindClassifier::new(vec![
            KindRule::new(NodeKind::Person, &["head"]),
            KindRule::new(NodeKind::Location, &["location"]),
        ]));
        let props = vec![entity_ref("P159", "headquarters location", "Q84")];
        let graph = builder.build(&entity(props), 15).unwrap();
        assert_eq!(graph.node("Q84").unwrap().kind, NodeKind::Person);
    }

    #[test]
    fn test_missing_id_is_build_error_and_recovers() {
        let mut e = entity(vec![entity_ref("P106", "occupation", "Q36180")]);
        e.id = String::new();
        let builder = GraphBuilder::default();
        assert!(matches!(builder.build(&e, 15), Err(WikigraphError::GraphBuild(_))));

        let graph = builder.build_or_hub(&e, 15);
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_never_exceeds_cap_with_mixed_rows() {
        let mut props = Vec::new();
        for i in 0..12 {
            props.push(entity_ref("P31", "instance of", "Q5"));
            props.push(entity_ref("P166", "award received", &format!("Q{}", 500 + i)));
            props.push(prop(
                "P18",
                "image",
                "img",
                &format!("http://commons.wikimedia.org/wiki/File:I{}.jpg", i),
            ));
        }
        for cap in 1..8 {
            let graph = GraphBuilder::default().build(&entity(props.clone()), cap).unwrap();
            assert!(graph.edges.len() <= cap);
            assert!(graph.contains_node("Q1"));
            assert_well_formed(&graph);
        }
    }
}
