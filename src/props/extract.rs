//! # Property Extraction
//!
//! Builds [`ComponentPropsInfo`] from a parsed [`Module`]: picks the
//! component, resolves its props type through local interfaces and aliases,
//! and merges defaults, JSDoc text and example values into one descriptor
//! per property.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::props::literal::literal_from_text;
use crate::props::parser::{ComponentDecl, Member, Module, TypeExpr};

/// Ordered `prop name -> literal default` map
pub type Defaults = Map<String, Value>;

/// Extraction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    pub include_private_props: bool,
    pub extract_examples: bool,
    pub resolve_unions: bool,
    /// How many named types deep props resolution may follow
    pub max_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_private_props: false,
            extract_examples: true,
            resolve_unions: true,
            max_depth: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPropsInfo {
    pub component_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub props: Vec<PropertyDescriptor>,
}

/// Extract the props of one component from TSX source.
///
/// Returns `None` when the source does not lex, has no top-level component,
/// or `symbol_hint` names a component that is not defined.
pub fn extract_props(
    source: &str,
    symbol_hint: Option<&str>,
    options: &ExtractOptions,
) -> Option<ComponentPropsInfo> {
    let module = match Module::parse(source) {
        Ok(module) => module,
        Err(err) => {
            debug!(error = %err, "Source does not tokenize");
            return None;
        }
    };

    let component = module.select_component(symbol_hint)?;
    let extractor = Extractor {
        module: &module,
        options,
    };
    Some(extractor.props_info(component))
}

/// Literal defaults of the component picked without a hint.
///
/// Falls back to the first top-level component that has any defaults when
/// the picked one has none. Never fails.
pub fn extract_defaults(source: &str) -> Defaults {
    let Ok(module) = Module::parse(source) else {
        return Defaults::new();
    };

    let Some(selected) = module.select_component(None) else {
        return Defaults::new();
    };

    let defaults = component_defaults(&module, selected);
    if !defaults.is_empty() {
        return defaults;
    }

    module
        .components
        .iter()
        .map(|c| component_defaults(&module, c))
        .find(|d| !d.is_empty())
        .unwrap_or_default()
}

/// Destructuring defaults followed by `defaultProps` entries, literals only.
fn component_defaults(module: &Module, component: &ComponentDecl) -> Defaults {
    let mut defaults = Defaults::new();

    for field in component.pattern() {
        if let Some(value) = &field.default {
            defaults.insert(field.key.clone(), value.clone());
        }
    }
    if let Some(entries) = module.default_props.get(&component.name) {
        for (key, value) in entries {
            if let Some(value) = value {
                if !defaults.contains_key(key) {
                    defaults.insert(key.clone(), value.clone());
                }
            }
        }
    }

    defaults
}

struct Extractor<'a> {
    module: &'a Module,
    options: &'a ExtractOptions,
}

impl<'a> Extractor<'a> {
    fn props_info(&self, component: &ComponentDecl) -> ComponentPropsInfo {
        let defaults = component_defaults(self.module, component);
        let defaulted = self.defaulted_names(component);

        let mut members = Vec::new();
        let resolved = component
            .props_type()
            .is_some_and(|ty| self.collect_members(ty, 0, &mut members));

        let props = if resolved {
            members
                .iter()
                .filter(|m| self.is_visible(&m.name, Some(m)))
                .map(|m| self.member_descriptor(m, &defaults, &defaulted))
                .collect()
        } else {
            debug!(component = %component.name, "No props type resolved, using parameter names");
            self.parameter_names(component)
                .iter()
                .filter(|name| self.is_visible(name, None))
                .map(|name| {
                    let optional = defaulted.contains(name);
                    self.inferred_descriptor(name, defaults.get(name.as_str()), optional)
                })
                .collect()
        };

        ComponentPropsInfo {
            component_name: component.name.clone(),
            description: component.doc.as_ref().and_then(|d| d.description.clone()),
            props,
        }
    }

    /// Destructured field names followed by `defaultProps` keys.
    fn parameter_names(&self, component: &ComponentDecl) -> Vec<String> {
        let mut names: Vec<String> = component.pattern().iter().map(|f| f.key.clone()).collect();
        if let Some(entries) = self.module.default_props.get(&component.name) {
            for (key, _) in entries {
                if !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }
        names
    }

    /// Names with any default at all, literal or not.
    fn defaulted_names(&self, component: &ComponentDecl) -> Vec<String> {
        let mut names: Vec<String> = component
            .pattern()
            .iter()
            .filter(|f| f.has_default)
            .map(|f| f.key.clone())
            .collect();
        if let Some(entries) = self.module.default_props.get(&component.name) {
            names.extend(entries.iter().map(|(key, _)| key.clone()));
        }
        names
    }

    fn is_visible(&self, name: &str, member: Option<&Member>) -> bool {
        if self.options.include_private_props {
            return true;
        }
        if name.starts_with('_') {
            return false;
        }
        !member
            .and_then(|m| m.doc.as_ref())
            .is_some_and(|doc| doc.has_tag("private") || doc.has_tag("internal"))
    }

    /// Flatten `ty` into object members. Returns false when nothing resolved.
    fn collect_members(&self, ty: &TypeExpr, depth: usize, out: &mut Vec<Member>) -> bool {
        match ty {
            TypeExpr::Object(members) => {
                for member in members {
                    push_member(out, member.clone());
                }
                true
            }
            TypeExpr::Intersection(parts) => {
                let mut any = false;
                for part in parts {
                    any |= self.collect_members(part, depth, out);
                }
                any
            }
            TypeExpr::Named { name, args } => {
                if depth >= self.options.max_depth {
                    debug!(type_name = %name, depth, "Props resolution depth exhausted");
                    return false;
                }
                self.collect_named(name, args, depth + 1, out)
            }
            _ => false,
        }
    }

    fn collect_named(
        &self,
        name: &str,
        args: &[TypeExpr],
        depth: usize,
        out: &mut Vec<Member>,
    ) -> bool {
        if let Some(decl) = self.module.interfaces.get(name) {
            for parent in &decl.extends {
                self.collect_members(parent, depth, out);
            }
            for member in &decl.members {
                push_member(out, member.clone());
            }
            return true;
        }
        if let Some(alias) = self.module.aliases.get(name) {
            return self.collect_members(alias, depth, out);
        }

        let short = name.rsplit('.').next().unwrap_or(name);
        let Some(inner) = args.first() else {
            return false;
        };

        let mut members = Vec::new();
        if !self.collect_members(inner, depth, &mut members) {
            return false;
        }

        match short {
            "Partial" => members.iter_mut().for_each(|m| m.optional = true),
            "Required" => members.iter_mut().for_each(|m| m.optional = false),
            "Readonly" => {}
            "PropsWithChildren" => push_member(
                &mut members,
                Member {
                    name: "children".to_string(),
                    ty: TypeExpr::named("React.ReactNode"),
                    optional: true,
                    doc: None,
                },
            ),
            "Omit" | "Pick" => {
                let keys = args.get(1).map(key_names).unwrap_or_default();
                let keep = short == "Pick";
                members.retain(|m| keys.contains(&m.name) == keep);
            }
            _ => return false,
        }

        for member in members {
            push_member(out, member);
        }
        true
    }

    /// Follow local aliases to the type a member name refers to.
    fn resolve_alias<'t>(&'t self, ty: &'t TypeExpr) -> &'t TypeExpr {
        let mut current = ty;
        for _ in 0..=self.options.max_depth {
            match current {
                TypeExpr::Named { name, args } if args.is_empty() => {
                    match self.module.aliases.get(name) {
                        Some(target) => current = target,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        current
    }

    fn member_descriptor(
        &self,
        member: &Member,
        defaults: &Defaults,
        defaulted: &[String],
    ) -> PropertyDescriptor {
        let resolved = self.resolve_alias(&member.ty);
        let union = resolved.literal_union();

        let type_name = match (&union, self.options.resolve_unions) {
            (Some(_), true) => resolved.text(),
            _ => member.ty.text(),
        };
        let allowed_values = match (&member.ty, self.options.resolve_unions) {
            (TypeExpr::Union(_), _) | (_, true) => union.clone().unwrap_or_default(),
            _ => Vec::new(),
        };

        let doc = member.doc.as_ref();
        let default_value = defaults
            .get(&member.name)
            .cloned()
            .or_else(|| doc.and_then(|d| d.tag("default")).and_then(literal_from_text));

        // A non-literal default still makes the prop optional
        let has_default = default_value.is_some() || defaulted.contains(&member.name);

        let example_value = if self.options.extract_examples {
            doc.and_then(|d| d.tag("example"))
                .and_then(literal_from_text)
                .or_else(|| default_value.clone())
                .or_else(|| example_for_type(resolved))
        } else {
            None
        };

        PropertyDescriptor {
            name: member.name.clone(),
            type_name,
            optional: member.optional || has_default,
            default_value,
            example_value,
            description: doc.and_then(|d| d.description.clone()),
            allowed_values,
        }
    }

    fn inferred_descriptor(
        &self,
        name: &str,
        default_value: Option<&Value>,
        optional: bool,
    ) -> PropertyDescriptor {
        let type_name = match default_value {
            Some(Value::String(_)) => "string",
            Some(Value::Number(_)) => "number",
            Some(Value::Bool(_)) => "boolean",
            _ => "unknown",
        };

        let example_value = if self.options.extract_examples {
            default_value
                .cloned()
                .or_else(|| example_for_type(&TypeExpr::named(type_name)))
        } else {
            None
        };

        PropertyDescriptor {
            name: name.to_string(),
            type_name: type_name.to_string(),
            optional,
            default_value: default_value.cloned(),
            example_value,
            description: None,
            allowed_values: Vec::new(),
        }
    }
}

/// Add a member, replacing an earlier one of the same name in place.
fn push_member(members: &mut Vec<Member>, member: Member) {
    match members.iter_mut().find(|m| m.name == member.name) {
        Some(existing) => *existing = member,
        None => members.push(member),
    }
}

/// Key names from the second argument of `Omit` / `Pick`.
fn key_names(ty: &TypeExpr) -> Vec<String> {
    let literals = match ty {
        TypeExpr::Literal(value) => vec![value.clone()],
        other => other.literal_union().unwrap_or_default(),
    };
    literals
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// A plausible example for a type with no documented example or default.
fn example_for_type(ty: &TypeExpr) -> Option<Value> {
    match ty {
        TypeExpr::Literal(value) => Some(value.clone()),
        TypeExpr::Union(parts) => {
            if let Some(first) = ty.literal_union().and_then(|l| l.into_iter().next()) {
                return Some(first);
            }
            parts
                .iter()
                .filter(|p| !matches!(p, TypeExpr::Named { name, .. } if name == "undefined" || name == "null"))
                .find_map(example_for_type)
        }
        TypeExpr::Array(_) | TypeExpr::Tuple(_) => Some(Value::Array(Vec::new())),
        TypeExpr::Named { name, .. } => match name.as_str() {
            "string" => Some(Value::String("text".to_string())),
            "number" => Some(Value::Number(0.into())),
            "boolean" => Some(Value::Bool(true)),
            "Array" | "ReadonlyArray" => Some(Value::Array(Vec::new())),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SKELETON: &str = r#"
import React from "react";

type Radius = "none" | "sm" | "md" | "lg" | "full";

interface BaseProps {
  /** Extra classes */
  className?: string;
}

export interface SkeletonProps extends BaseProps {
  /** Width of the skeleton */
  width?: string | number;
  height?: string | number;
  /** @default "md" */
  radius?: Radius;
  animation?: "pulse" | "wave" | "none";
  count?: number;
  /** @internal */
  debugId?: string;
  _key?: string;
  /**
   * Called after the shimmer settles
   * @example "handler"
   */
  onSettled?: () => void;
  label: string;
}

/**
 * A versatile skeleton loading component
 */
export function Skeleton({
  width = "100%",
  height = "1rem",
  radius = "md",
  animation = "pulse",
  count = 1,
  className,
  label,
}: SkeletonProps) {
  return <div />;
}

export function SkeletonCard({ lines = 3 }: { lines?: number }) {
  return <Skeleton label="card" />;
}
"#;

    fn prop<'a>(info: &'a ComponentPropsInfo, name: &str) -> &'a PropertyDescriptor {
        info.props
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("missing prop {}", name))
    }

    #[test]
    fn test_extract_defaults_from_destructuring() {
        let source = r#"export function Skeleton({ width = "100%", radius = "md" }) { return null; }"#;
        let defaults = extract_defaults(source);
        assert_eq!(
            Value::Object(defaults),
            json!({ "width": "100%", "radius": "md" })
        );
    }

    #[test]
    fn test_extract_defaults_preserves_order_and_skips_non_literals() {
        let source = r##"
export const Orb = ({ hue = 240, onHover = () => {}, glow = true, colors = ["#fff"] }) => null;
"##;
        let defaults = extract_defaults(source);
        let keys: Vec<_> = defaults.keys().cloned().collect();
        assert_eq!(keys, vec!["hue", "glow", "colors"]);
        assert_eq!(defaults["colors"], json!(["#fff"]));
    }

    #[test]
    fn test_extract_defaults_includes_default_props() {
        let source = r#"
function Card({ title = "Card" }) { return null; }
Card.defaultProps = { title: "Ignored", elevated: false };
export default Card;
"#;
        let defaults = extract_defaults(source);
        assert_eq!(Value::Object(defaults), json!({ "title": "Card", "elevated": false }));
    }

    #[test]
    fn test_extract_defaults_from_wrapped_default_export() {
        let source = r#"
export default React.memo(function Orb({ hue = 240, pulse = true }) {
  return <div />;
});
"#;
        assert_eq!(
            Value::Object(extract_defaults(source)),
            json!({ "hue": 240, "pulse": true })
        );
    }

    #[test]
    fn test_url_in_jsx_text_keeps_later_components() {
        let source = r#"
function Footer({ show = true }) {
  return <div>{show && <p>Docs at https://vui.dev</p>}</div>;
}

export function Skeleton({ width = "100%", radius = "md" }) { return null; }
"#;
        let info = extract_props(source, Some("Skeleton"), &ExtractOptions::default()).unwrap();
        assert_eq!(info.component_name, "Skeleton");
        assert_eq!(
            Value::Object(extract_defaults(source)),
            json!({ "width": "100%", "radius": "md" })
        );
    }

    #[test]
    fn test_extract_defaults_never_fails() {
        assert!(extract_defaults("").is_empty());
        assert!(extract_defaults("const x = `unterminated").is_empty());
        assert!(extract_defaults("export const colors = ['a'];").is_empty());
    }

    #[test]
    fn test_extract_props_interface_members() {
        let info = extract_props(SKELETON, Some("Skeleton"), &ExtractOptions::default()).unwrap();
        assert_eq!(info.component_name, "Skeleton");
        assert_eq!(
            info.description.as_deref(),
            Some("A versatile skeleton loading component")
        );

        let names: Vec<_> = info.props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["className", "width", "height", "radius", "animation", "count", "onSettled", "label"]
        );

        let width = prop(&info, "width");
        assert_eq!(width.type_name, "string | number");
        assert!(width.optional);
        assert_eq!(width.default_value, Some(json!("100%")));
        assert_eq!(width.description.as_deref(), Some("Width of the skeleton"));

        let label = prop(&info, "label");
        assert!(!label.optional);
        assert_eq!(label.default_value, None);
        assert_eq!(label.example_value, Some(json!("text")));
    }

    #[test]
    fn test_extract_props_resolves_union_aliases() {
        let info = extract_props(SKELETON, Some("Skeleton"), &ExtractOptions::default()).unwrap();

        let radius = prop(&info, "radius");
        assert_eq!(radius.type_name, r#""none" | "sm" | "md" | "lg" | "full""#);
        assert_eq!(radius.allowed_values.len(), 5);

        let animation = prop(&info, "animation");
        assert_eq!(
            animation.allowed_values,
            vec![json!("pulse"), json!("wave"), json!("none")]
        );

        let options = ExtractOptions {
            resolve_unions: false,
            ..ExtractOptions::default()
        };
        let info = extract_props(SKELETON, Some("Skeleton"), &options).unwrap();
        let radius = prop(&info, "radius");
        assert_eq!(radius.type_name, "Radius");
        assert!(radius.allowed_values.is_empty());
        assert_eq!(prop(&info, "animation").allowed_values.len(), 3);
    }

    #[test]
    fn test_extract_props_examples() {
        let info = extract_props(SKELETON, Some("Skeleton"), &ExtractOptions::default()).unwrap();
        assert_eq!(prop(&info, "count").example_value, Some(json!(1)));
        assert_eq!(prop(&info, "onSettled").example_value, Some(json!("handler")));
        assert_eq!(prop(&info, "className").example_value, Some(json!("text")));

        let options = ExtractOptions {
            extract_examples: false,
            ..ExtractOptions::default()
        };
        let info = extract_props(SKELETON, Some("Skeleton"), &options).unwrap();
        assert!(info.props.iter().all(|p| p.example_value.is_none()));
    }

    #[test]
    fn test_extract_props_private_filtering() {
        let info = extract_props(SKELETON, Some("Skeleton"), &ExtractOptions::default()).unwrap();
        assert!(info.props.iter().all(|p| p.name != "debugId" && p.name != "_key"));

        let options = ExtractOptions {
            include_private_props: true,
            ..ExtractOptions::default()
        };
        let info = extract_props(SKELETON, Some("Skeleton"), &options).unwrap();
        assert!(info.props.iter().any(|p| p.name == "debugId"));
        assert!(info.props.iter().any(|p| p.name == "_key"));
    }

    #[test]
    fn test_extract_props_max_depth() {
        let options = ExtractOptions {
            max_depth: 1,
            ..ExtractOptions::default()
        };
        let info = extract_props(SKELETON, Some("Skeleton"), &options).unwrap();
        assert!(info.props.iter().all(|p| p.name != "className"));
        assert!(info.props.iter().any(|p| p.name == "width"));
    }

    #[test]
    fn test_extract_props_hint_selection() {
        let info = extract_props(SKELETON, Some("SkeletonCard"), &ExtractOptions::default()).unwrap();
        assert_eq!(info.component_name, "SkeletonCard");
        assert_eq!(info.props.len(), 1);
        assert_eq!(info.props[0].default_value, Some(json!(3)));

        assert!(extract_props(SKELETON, Some("Missing"), &ExtractOptions::default()).is_none());

        let first = extract_props(SKELETON, None, &ExtractOptions::default()).unwrap();
        assert_eq!(first.component_name, "Skeleton");
    }

    #[test]
    fn test_extract_props_without_component() {
        assert!(extract_props("export const x = 1;", None, &ExtractOptions::default()).is_none());
        assert!(extract_props("", None, &ExtractOptions::default()).is_none());
    }

    #[test]
    fn test_extract_props_falls_back_to_parameter_names() {
        let source = r#"
export default function Space({ speed = 1, color = "white", twinkle = true, stars }) {
  return null;
}
"#;
        let info = extract_props(source, None, &ExtractOptions::default()).unwrap();
        let types: Vec<_> = info
            .props
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_str(), p.optional))
            .collect();
        assert_eq!(
            types,
            vec![
                ("speed", "number", true),
                ("color", "string", true),
                ("twinkle", "boolean", true),
                ("stars", "unknown", false),
            ]
        );
    }

    #[test]
    fn test_extract_props_forward_ref_and_utility_types() {
        let source = r#"
interface ButtonProps {
  variant: "primary" | "ghost";
  size: "sm" | "md";
  ref?: unknown;
}

export const Button = React.forwardRef<HTMLButtonElement, Omit<Partial<ButtonProps>, "ref">>(
  ({ variant = "primary" }, ref) => <button ref={ref} />
);
"#;
        let info = extract_props(source, None, &ExtractOptions::default()).unwrap();
        let names: Vec<_> = info.props.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["variant", "size"]);
        assert!(info.props.iter().all(|p| p.optional));
        assert_eq!(prop(&info, "size").example_value, Some(json!("sm")));
    }

    #[test]
    fn test_props_info_serializes_camel_case() {
        let info = ComponentPropsInfo {
            component_name: "Card".to_string(),
            description: None,
            props: vec![PropertyDescriptor {
                name: "title".to_string(),
                type_name: "string".to_string(),
                optional: true,
                default_value: Some(json!("Hi")),
                example_value: None,
                description: None,
                allowed_values: Vec::new(),
            }],
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({
                "componentName": "Card",
                "props": [{
                    "name": "title",
                    "type": "string",
                    "optional": true,
                    "defaultValue": "Hi",
                    "allowedValues": []
                }]
            })
        );
    }
}
