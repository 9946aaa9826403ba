//! Extra-properties merger.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::distribution::{Distribution, DistributionType};
use crate::packagers::BackendSpec;

/// Merge parent extra properties into the child's, child wins.
///
/// For native packages the backend's app-name key defaults to
/// `<distribution>.app` when neither side sets it.
pub fn merge_extra_properties(
    child: &BTreeMap<String, Value>,
    parent: &BTreeMap<String, Value>,
    spec: &BackendSpec,
    distribution: &Distribution,
) -> BTreeMap<String, Value> {
    let mut merged = parent.clone();
    merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));

    if distribution.distribution_type == DistributionType::NativePackage {
        if let Some(key) = spec.app_name_key {
            let blank = match merged.get(key) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            };
            if blank {
                merged.insert(
                    key.to_string(),
                    Value::String(format!("{}.app", distribution.name)),
                );
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packagers::{brew, macports};
    use serde_json::json;

    fn map(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_child_wins() {
        let distribution = Distribution::new("foo", DistributionType::NativePackage);
        let child = map(json!({"appName": "X"}));
        let parent = map(json!({"appName": "Y", "other": "Z"}));

        let merged = merge_extra_properties(&child, &parent, &macports::SPEC, &distribution);
        assert_eq!(merged, map(json!({"appName": "X", "other": "Z"})));
    }

    #[test]
    fn test_app_name_default() {
        let distribution = Distribution::new("foo", DistributionType::NativePackage);
        let merged = merge_extra_properties(&BTreeMap::new(), &BTreeMap::new(), &macports::SPEC, &distribution);
        assert_eq!(merged.get("appName"), Some(&json!("foo.app")));

        let again = merge_extra_properties(&merged, &BTreeMap::new(), &macports::SPEC, &distribution);
        assert_eq!(again, merged);
    }

    #[test]
    fn test_app_name_only_for_native_packages() {
        let binary = Distribution::new("foo", DistributionType::Binary);
        let merged = merge_extra_properties(&BTreeMap::new(), &BTreeMap::new(), &macports::SPEC, &binary);
        assert!(merged.is_empty());

        let native = Distribution::new("foo", DistributionType::NativePackage);
        let merged = merge_extra_properties(&BTreeMap::new(), &BTreeMap::new(), &brew::SPEC, &native);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_parent_app_name_is_inherited() {
        let distribution = Distribution::new("foo", DistributionType::NativePackage);
        let parent = map(json!({"appName": "Parent.app"}));
        let merged = merge_extra_properties(&BTreeMap::new(), &parent, &macports::SPEC, &distribution);
        assert_eq!(merged.get("appName"), Some(&json!("Parent.app")));
    }
}
