//! Course-level metadata extraction.
//!
//! Every lookup is independent and tolerant: a missing node or attribute
//! yields [`Field::NotAvailable`] and never an error, because real-world
//! manifests are frequently incomplete.

use crate::common::Field;
use crate::scorm::manifest::{self, ScormType};
use crate::scorm::namespace::NamespaceMap;
use crate::xml::Element;
use serde::{Serialize, Serializer};
use std::fmt;

/// Navigation flow declared by `imsss:controlMode/@flow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowMode {
    /// `flow="true"`: the learner is led through items in order
    ForcedLinear,
    /// Anything else: the learner picks items freely
    UserChoice,
}

impl FlowMode {
    /// Only the literal string `"true"` selects forced flow.
    pub fn from_attribute(value: Option<&str>) -> Self {
        if value == Some("true") {
            FlowMode::ForcedLinear
        } else {
            FlowMode::UserChoice
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            FlowMode::ForcedLinear => "Forced/Linear",
            FlowMode::UserChoice => "User Choice",
        }
    }
}

impl fmt::Display for FlowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FlowMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Summary of the first sequencing node's control mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SequencingRules {
    #[serde(rename = "Flow")]
    pub flow: Field<FlowMode>,
    /// `forwardOnly` copied verbatim; `"false"` when the attribute is absent
    #[serde(rename = "Forward Only")]
    pub forward_only: Field<String>,
}

/// Descriptive and technical properties of a package.
///
/// Passing score, launch file and primary type come from the first item in
/// document order, whichever organization holds it. When the outline is built
/// from a default organization that is not the first one, these three fields
/// describe a different organization than the outline does.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Metadata {
    #[serde(rename = "Description")]
    pub description: Field<String>,
    #[serde(rename = "Keywords")]
    pub keywords: Field<String>,
    /// Mastery score of the first item only
    #[serde(rename = "Passing Score")]
    pub passing_score: Field<String>,
    #[serde(rename = "Launch File")]
    pub launch_file: Field<String>,
    #[serde(rename = "SCORM Type (Primary)")]
    pub primary_type: Field<ScormType>,
    #[serde(rename = "SCO Count")]
    pub sco_count: usize,
    #[serde(rename = "Asset Count")]
    pub asset_count: usize,
    #[serde(rename = "Sequencing Rules")]
    pub sequencing_rules: Field<SequencingRules>,
}

impl Metadata {
    /// Total number of resources declared by the manifest.
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.sco_count + self.asset_count
    }
}

/// Extract metadata from a parsed manifest.
pub fn extract_metadata(root: &Element, ns: &NamespaceMap) -> Metadata {
    let mut metadata = Metadata::default();

    let meta_node = root.find(ns.imscp("metadata"));
    metadata.description = lom_string(meta_node, ns, "description");
    metadata.keywords = lom_string(meta_node, ns, "keyword");

    if let Some(first_item) = root.find(ns.imscp("item")) {
        metadata.passing_score = Field::text(
            first_item
                .find(ns.adlcp("masteryscore"))
                .map(Element::text),
        );

        if let Some(reference) = manifest::item_reference(first_item)
            && let Some(resource) = manifest::find_resource(root, ns, reference)
        {
            metadata.launch_file = Field::text(resource.attribute("href"));
            metadata.primary_type = Field::Present(ScormType::of_resource(resource, ns));
        }
    }

    for resource in root.find_all(ns.imscp("resource")) {
        match ScormType::of_resource(resource, ns) {
            ScormType::Sco => metadata.sco_count += 1,
            ScormType::Asset => metadata.asset_count += 1,
        }
    }

    if let Some(sequencing) = manifest::sequencing(root, ns) {
        metadata.sequencing_rules = Field::Present(sequencing_rules(sequencing, ns));
    }

    metadata
}

/// Text of `.//lom:<element>/lom:string` under the metadata node.
fn lom_string(meta_node: Option<&Element>, ns: &NamespaceMap, element: &str) -> Field<String> {
    let found = meta_node.and_then(|node| node.find_child_of(ns.lom(element), ns.lom("string")));
    Field::text(found.map(Element::text))
}

fn sequencing_rules(sequencing: &Element, ns: &NamespaceMap) -> SequencingRules {
    match sequencing.child(ns.imsss("controlMode")) {
        Some(control_mode) => SequencingRules {
            flow: Field::Present(FlowMode::from_attribute(control_mode.attribute("flow"))),
            forward_only: Field::Present(
                control_mode
                    .attribute("forwardOnly")
                    .unwrap_or("false")
                    .to_string(),
            ),
        },
        None => SequencingRules::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(xml: &str) -> Metadata {
        let root = Element::parse(xml.as_bytes()).unwrap();
        let ns = NamespaceMap::resolve(&root);
        extract_metadata(&root, &ns)
    }

    const FULL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest identifier="COURSE-1" version="1.0"
    xmlns="http://www.imsglobal.org/xsd/imscp_v1p1"
    xmlns:adlcp="http://www.adlnet.org/xsd/adlcp_v1p3"
    xmlns:imsss="http://www.imsglobal.org/xsd/imsss_v1p0"
    xmlns:lom="http://ltsc.ieee.org/xsd/LOM">
  <metadata>
    <schema>ADL SCORM</schema>
    <lom:lom>
      <lom:general>
        <lom:description><lom:string language="en">  Workplace safety basics  </lom:string></lom:description>
        <lom:keyword><lom:string>safety</lom:string></lom:keyword>
      </lom:general>
    </lom:lom>
  </metadata>
  <organizations default="ORG">
    <organization identifier="ORG">
      <title>Safety 101</title>
      <item identifier="ITEM-1" identifierref="RES-1">
        <title>Lesson 1</title>
        <adlcp:masteryscore>80</adlcp:masteryscore>
      </item>
      <imsss:sequencing>
        <imsss:controlMode choice="false" flow="true" forwardOnly="true"/>
      </imsss:sequencing>
    </organization>
  </organizations>
  <resources>
    <resource identifier="RES-1" type="webcontent" adlcp:scormType="sco" href="lesson1/index.html"/>
    <resource identifier="RES-2" type="webcontent" adlcp:scormType="asset" href="shared/logo.png"/>
    <resource identifier="RES-3" type="webcontent" href="shared/styles.css"/>
  </resources>
</manifest>"#;

    #[test]
    fn test_full_manifest() {
        let metadata = extract(FULL);
        assert_eq!(metadata.description.as_str(), "Workplace safety basics");
        assert_eq!(metadata.keywords.as_str(), "safety");
        assert_eq!(metadata.passing_score.as_str(), "80");
        assert_eq!(metadata.launch_file.as_str(), "lesson1/index.html");
        assert_eq!(metadata.primary_type, Field::Present(ScormType::Sco));
        assert_eq!(metadata.sco_count, 1);
        assert_eq!(metadata.asset_count, 2);

        let rules = metadata.sequencing_rules.as_option().unwrap();
        assert_eq!(rules.flow, Field::Present(FlowMode::ForcedLinear));
        assert_eq!(rules.forward_only.as_str(), "true");
    }

    #[test]
    fn test_empty_manifest_uses_sentinels() {
        let metadata = extract("<manifest/>");
        assert_eq!(metadata, Metadata::default());
        assert_eq!(metadata.description.as_str(), "N/A");
        assert_eq!(metadata.passing_score.to_string(), "N/A");
        assert_eq!(metadata.resource_count(), 0);
    }

    #[test]
    fn test_reference_without_matching_resource() {
        let metadata = extract(
            r#"<manifest><organizations><organization>
                 <item identifier="I" identifierref="GONE"><title>T</title></item>
               </organization></organizations></manifest>"#,
        );
        assert_eq!(metadata.launch_file, Field::NotAvailable);
        assert_eq!(metadata.primary_type, Field::NotAvailable);
        assert_eq!(metadata.passing_score, Field::NotAvailable);
    }

    #[test]
    fn test_primary_type_defaults_to_asset() {
        let metadata = extract(
            r#"<manifest><organizations><organization>
                 <item identifier="I" identifierref="R"/>
               </organization></organizations>
               <resources><resource identifier="R"/></resources></manifest>"#,
        );
        assert_eq!(metadata.primary_type, Field::Present(ScormType::Asset));
        assert_eq!(metadata.launch_file, Field::NotAvailable);
        assert_eq!(metadata.asset_count, 1);
    }

    #[test]
    fn test_flow_requires_literal_true() {
        let metadata = extract(
            r#"<manifest xmlns:imsss="http://www.imsglobal.org/xsd/imsss_v1p0">
                 <imsss:sequencing><imsss:controlMode flow="TRUE"/></imsss:sequencing>
               </manifest>"#,
        );
        let rules = metadata.sequencing_rules.into_option().unwrap();
        assert_eq!(rules.flow, Field::Present(FlowMode::UserChoice));
        assert_eq!(rules.forward_only.as_str(), "false");
    }

    #[test]
    fn test_sequencing_without_control_mode() {
        let metadata = extract(
            r#"<manifest xmlns:imsss="http://www.imsglobal.org/xsd/imsss_v1p0">
                 <imsss:sequencing/>
               </manifest>"#,
        );
        assert_eq!(metadata.sequencing_rules, Field::Present(SequencingRules::default()));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(extract(FULL)).unwrap();
        assert_eq!(json["SCORM Type (Primary)"], "SCO");
        assert_eq!(json["SCO Count"], 1);
        assert_eq!(json["Sequencing Rules"]["Flow"], "Forced/Linear");
        assert_eq!(json["Sequencing Rules"]["Forward Only"], "true");

        let json = serde_json::to_value(extract("<manifest/>")).unwrap();
        assert_eq!(json["Launch File"], "N/A");
        assert_eq!(json["Sequencing Rules"], "N/A");
    }
}
