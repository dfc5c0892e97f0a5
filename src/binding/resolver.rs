//! Binding resolver.
//!
//! Location precedence, highest first: the field's own `location`, its oneof
//! group's `default_oneof_location`, the message's `default_location`, then
//! [`FALLBACK_LOCATION`]. Auto tags are merged rather than overridden:
//! message defaults, then oneof defaults, then the field's own, each in
//! declaration order with duplicates kept.
//!
//! Resolution is total. A field whose oneof group has no options entry simply
//! inherits nothing from that scope; membership is checked by the extractor.

use crate::binding::types::{
    FieldDescriptor, Location, LocationSource, MessageDescriptor, OneofOptions, ResolvedBinding,
};

/// Location used when no scope specifies one
pub const FALLBACK_LOCATION: Location = Location::Body;

/// Resolve one field of `message`
pub fn resolve_field(message: &MessageDescriptor, field: &FieldDescriptor) -> ResolvedBinding {
    let oneof: Option<&OneofOptions> = field
        .oneof
        .as_ref()
        .and_then(|group| message.oneofs.get(group));

    let (location, location_source) = first_specified([
        (field.options.location, LocationSource::Field),
        (
            oneof.map_or(Location::Unspecified, |o| o.default_oneof_location),
            LocationSource::Oneof,
        ),
        (message.options.default_location, LocationSource::Message),
    ]);

    let oneof_tags = oneof.map_or(&[][..], |o| o.default_oneof_auto_tags.as_slice());
    let auto_tags = message
        .options
        .default_auto_tags
        .iter()
        .chain(oneof_tags)
        .chain(&field.options.auto_tags)
        .cloned()
        .collect();

    ResolvedBinding {
        location,
        location_source,
        auto_tags,
        custom_tags: field.options.tags.clone(),
    }
}

/// Resolve every field of `message`, in declaration order
pub fn resolve_message(message: &MessageDescriptor) -> Vec<ResolvedBinding> {
    message
        .fields
        .iter()
        .map(|field| resolve_field(message, field))
        .collect()
}

fn first_specified<const N: usize>(
    candidates: [(Location, LocationSource); N],
) -> (Location, LocationSource) {
    candidates
        .into_iter()
        .find(|(location, _)| location.is_specified())
        .unwrap_or((FALLBACK_LOCATION, LocationSource::Fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::types::{FieldOptions, MessageOptions};

    fn field_with(location: Location, auto_tags: &[&str]) -> FieldOptions {
        FieldOptions {
            location,
            tags: None,
            auto_tags: auto_tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn message_defaults(location: Location, auto_tags: &[&str]) -> MessageOptions {
        MessageOptions {
            default_location: location,
            default_auto_tags: auto_tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn oneof_defaults(location: Location, auto_tags: &[&str]) -> OneofOptions {
        OneofOptions {
            default_oneof_location: location,
            default_oneof_auto_tags: auto_tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_options_falls_back_to_body() {
        let message = MessageDescriptor::new("Empty").with_field(FieldDescriptor::new("name", 1));
        let resolved = resolve_field(&message, &message.fields[0]);

        assert_eq!(resolved.location, Location::Body);
        assert_eq!(resolved.location_source, LocationSource::Fallback);
        assert!(resolved.auto_tags.is_empty());
        assert_eq!(resolved.custom_tags, None);
    }

    #[test]
    fn test_field_location_overrides_everything() {
        let message = MessageDescriptor::new("M")
            .with_options(message_defaults(Location::Uri, &[]))
            .with_oneof("group", oneof_defaults(Location::Body, &[]))
            .with_field(
                FieldDescriptor::new("fields", 1)
                    .with_oneof("group")
                    .with_options(field_with(Location::Query, &[])),
            );

        let resolved = resolve_field(&message, &message.fields[0]);
        assert_eq!(resolved.location, Location::Query);
        assert_eq!(resolved.location_source, LocationSource::Field);
    }

    #[test]
    fn test_oneof_default_beats_message_default() {
        let message = MessageDescriptor::new("M")
            .with_options(message_defaults(Location::Query, &[]))
            .with_oneof("key", oneof_defaults(Location::Uri, &[]))
            .with_field(FieldDescriptor::new("id", 1).with_oneof("key"))
            .with_field(FieldDescriptor::new("page", 2));

        let resolved = resolve_message(&message);
        assert_eq!(resolved[0].location, Location::Uri);
        assert_eq!(resolved[0].location_source, LocationSource::Oneof);
        assert_eq!(resolved[1].location, Location::Query);
        assert_eq!(resolved[1].location_source, LocationSource::Message);
    }

    #[test]
    fn test_unspecified_oneof_default_defers_to_message() {
        let message = MessageDescriptor::new("M")
            .with_options(message_defaults(Location::Query, &[]))
            .with_oneof("key", OneofOptions::default())
            .with_field(FieldDescriptor::new("id", 1).with_oneof("key"));

        let resolved = resolve_field(&message, &message.fields[0]);
        assert_eq!(resolved.location, Location::Query);
    }

    #[test]
    fn test_auto_tags_accumulate_in_scope_order() {
        let message = MessageDescriptor::new("M")
            .with_options(message_defaults(Location::Unspecified, &["db", "json"]))
            .with_oneof("key", oneof_defaults(Location::Unspecified, &["json"]))
            .with_field(
                FieldDescriptor::new("id", 1)
                    .with_oneof("key")
                    .with_options(field_with(Location::Unspecified, &["audit"])),
            )
            .with_field(
                FieldDescriptor::new("name", 2)
                    .with_options(field_with(Location::Unspecified, &["audit"])),
            );

        let resolved = resolve_message(&message);
        assert_eq!(resolved[0].auto_tags, vec!["db", "json", "json", "audit"]);
        assert_eq!(resolved[1].auto_tags, vec!["db", "json", "audit"]);
    }

    #[test]
    fn test_missing_oneof_entry_inherits_nothing() {
        let message = MessageDescriptor::new("M")
            .with_field(FieldDescriptor::new("id", 1).with_oneof("ghost"));

        let resolved = resolve_field(&message, &message.fields[0]);
        assert_eq!(resolved.location, FALLBACK_LOCATION);
        assert!(resolved.auto_tags.is_empty());
    }

    #[test]
    fn test_custom_tags_carried_verbatim() {
        let options = FieldOptions {
            tags: Some("validate:\"required,max=64\"".to_string()),
            ..Default::default()
        };
        let message = MessageDescriptor::new("M")
            .with_field(FieldDescriptor::new("query", 1).with_options(options));

        let resolved = resolve_field(&message, &message.fields[0]);
        assert_eq!(resolved.custom_tags.as_deref(), Some("validate:\"required,max=64\""));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let message = MessageDescriptor::new("M")
            .with_options(message_defaults(Location::Uri, &["db"]))
            .with_field(FieldDescriptor::new("a", 1))
            .with_field(
                FieldDescriptor::new("b", 2).with_options(field_with(Location::Query, &["x"])),
            );

        assert_eq!(resolve_message(&message), resolve_message(&message));
    }
}
