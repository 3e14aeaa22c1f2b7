//! Gramps XML 1.7.1 entity translators.
//!
//! Each function declares one element of the Gramps DTD as a [`TagSpec`].
//! Child tags are listed in DTD order so exported files keep the expected
//! sequence; date tags are always appended by the date contributor.

use std::sync::Arc;

use super::cardinality::Quantifier;
use super::date::DateContributor;
use super::spec::{AttrType, TagSpec};

fn date() -> Arc<DateContributor> {
    Arc::new(DateContributor)
}

fn text() -> Arc<TagSpec> {
    TagSpec::text("Text").into_shared()
}

fn reference() -> Arc<TagSpec> {
    TagSpec::reference("Ref").into_shared()
}

/// Attributes shared by all primary objects.
fn primary_object(name: &str) -> TagSpec {
    TagSpec::new(name)
        .with_attr("id", AttrType::String)
        .with_attr("handle", AttrType::String)
        .with_attr("priv", AttrType::Boolean)
        .with_attr("change", AttrType::Timestamp)
}

/// `<attribute type=".." value="..">` with citations and notes.
pub fn attribute() -> TagSpec {
    TagSpec::new("Attribute")
        .with_attr("priv", AttrType::Boolean)
        .with_attrs(["type", "value"])
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

/// `<srcattribute>` on sources.
pub fn source_attribute() -> TagSpec {
    TagSpec::new("SourceAttribute")
        .with_attr("priv", AttrType::Boolean)
        .with_attrs(["type", "value"])
}

pub fn url() -> TagSpec {
    TagSpec::new("Url")
        .with_attr("priv", AttrType::Boolean)
        .with_attrs(["type", "href", "description"])
}

pub fn event_ref() -> TagSpec {
    TagSpec::reference("EventRef")
        .with_attr("priv", AttrType::Boolean)
        .with_attr("role", AttrType::String)
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

/// `<region>` inside a media reference; corners are percentages.
pub fn region() -> TagSpec {
    TagSpec::new("Region")
        .with_attr("corner1_x", AttrType::Integer)
        .with_attr("corner1_y", AttrType::Integer)
        .with_attr("corner2_x", AttrType::Integer)
        .with_attr("corner2_y", AttrType::Integer)
}

pub fn object_ref() -> TagSpec {
    TagSpec::reference("MediaObjectRef")
        .with_attr("priv", AttrType::Boolean)
        .with_tag("region", Quantifier::maybe_one(region().into_shared()))
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

pub fn child_ref() -> TagSpec {
    TagSpec::reference("ChildRef")
        .with_attr("priv", AttrType::Boolean)
        .with_attrs(["mrel", "frel"])
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

pub fn repo_ref() -> TagSpec {
    TagSpec::reference("RepoRef")
        .with_attr("priv", AttrType::Boolean)
        .with_attrs(["callno", "medium"])
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

pub fn person_ref() -> TagSpec {
    TagSpec::reference("PersonRef")
        .with_attr("priv", AttrType::Boolean)
        .with_attr("rel", AttrType::String)
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
}

pub fn address() -> TagSpec {
    let mut spec = TagSpec::new("Address").with_attr("priv", AttrType::Boolean);
    for tag in [
        "street", "locality", "city", "county", "state", "country", "postal", "phone",
    ] {
        spec = spec.with_tag(tag, Quantifier::maybe_one(text()));
    }
    spec.with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_contributor(date())
}

pub fn location() -> TagSpec {
    TagSpec::new("Location").with_attrs([
        "street", "locality", "city", "parish", "county", "state", "country", "postal", "phone",
    ])
}

/// `<pname>`: one of possibly several names of a place.
pub fn place_name() -> TagSpec {
    TagSpec::new("PlaceName")
        .with_attrs(["lang", "value"])
        .with_contributor(date())
}

/// `<surname>`: any name part other than the given name.
pub fn surname() -> TagSpec {
    TagSpec::new("Surname")
        .with_attr("prefix", AttrType::String)
        .with_attr("prim", AttrType::Boolean)
        .with_attrs(["derivation", "connector"])
        .with_text_under_key("text")
}

pub fn person_name() -> TagSpec {
    TagSpec::new("PersonName")
        .with_attr("priv", AttrType::Boolean)
        .with_attr("alt", AttrType::Boolean)
        .with_attrs(["type", "sort", "display"])
        .with_tag("first", Quantifier::maybe_one(text()))
        .with_tag("call", Quantifier::maybe_one(text()))
        .with_tag("surname", Quantifier::maybe_many(surname().into_shared()))
        .with_tag("suffix", Quantifier::maybe_one(text()))
        .with_tag("title", Quantifier::maybe_one(text()))
        .with_tag("nick", Quantifier::maybe_one(text()))
        .with_tag("familynick", Quantifier::maybe_one(text()))
        .with_tag("group", Quantifier::maybe_one(text()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_contributor(date())
}

pub fn gender() -> TagSpec {
    TagSpec::text("Gender").with_allowed_values(&["M", "F", "U"])
}

pub fn person() -> TagSpec {
    primary_object("Person")
        .with_tag("gender", Quantifier::one(gender().into_shared()))
        .with_tag("name", Quantifier::maybe_many(person_name().into_shared()))
        .with_tag("eventref", Quantifier::maybe_many(event_ref().into_shared()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag("address", Quantifier::maybe_many(address().into_shared()))
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("url", Quantifier::maybe_many(url().into_shared()))
        .with_tag("childof", Quantifier::maybe_many(reference()))
        .with_tag("parentin", Quantifier::maybe_many(reference()))
        .with_tag("personref", Quantifier::maybe_many(person_ref().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

pub fn family() -> TagSpec {
    let rel = TagSpec::new("FamilyRel").with_attrs(["type"]);

    primary_object("Family")
        .with_tag("rel", Quantifier::maybe_one(rel.into_shared()))
        .with_tag("father", Quantifier::maybe_one(reference()))
        .with_tag("mother", Quantifier::maybe_one(reference()))
        .with_tag("eventref", Quantifier::maybe_many(event_ref().into_shared()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag("childref", Quantifier::maybe_many(child_ref().into_shared()))
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

/// `<event>`. `place` is kept as a list of references natively.
pub fn event() -> TagSpec {
    primary_object("Event")
        .with_tag("type", Quantifier::maybe_one(text()))
        .with_tag("place", Quantifier::maybe_many(reference()))
        .with_tag("cause", Quantifier::maybe_one(text()))
        .with_tag("description", Quantifier::maybe_one(text()))
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
        .with_contributor(date())
}

pub fn source() -> TagSpec {
    primary_object("Source")
        .with_tag("stitle", Quantifier::maybe_one(text()))
        .with_tag("sauthor", Quantifier::maybe_one(text()))
        .with_tag("spubinfo", Quantifier::maybe_one(text()))
        .with_tag("sabbrev", Quantifier::maybe_one(text()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag(
            "srcattribute",
            Quantifier::maybe_many(source_attribute().into_shared()),
        )
        .with_tag("reporef", Quantifier::maybe_many(repo_ref().into_shared()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

pub fn place() -> TagSpec {
    let coord = TagSpec::new("PlaceCoord").with_attrs(["long", "lat"]);

    primary_object("Place")
        .with_attr("type", AttrType::String)
        .with_tag("ptitle", Quantifier::maybe_one(text()))
        .with_tag("pname", Quantifier::one_or_more(place_name().into_shared()))
        .with_tag("code", Quantifier::maybe_one(text()))
        .with_tag("coord", Quantifier::maybe_one(coord.into_shared()))
        .with_tag("placeref", Quantifier::maybe_many(place_ref().into_shared()))
        .with_tag("location", Quantifier::maybe_many(location().into_shared()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag("url", Quantifier::maybe_many(url().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

/// `<placeref>`: enclosing place, optionally dated.
pub fn place_ref() -> TagSpec {
    TagSpec::reference("PlaceRef").with_contributor(date())
}

pub fn media_object() -> TagSpec {
    let file = TagSpec::new("File").with_attrs(["src", "mime", "checksum", "description"]);

    primary_object("MediaObject")
        .with_tag("file", Quantifier::one(file.into_shared()))
        .with_tag("attribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("citationref", Quantifier::maybe_many(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
        .with_contributor(date())
}

pub fn repository() -> TagSpec {
    primary_object("Repository")
        .with_tag("rname", Quantifier::one(text()))
        .with_tag("type", Quantifier::one(text()))
        .with_tag("address", Quantifier::maybe_many(address().into_shared()))
        .with_tag("url", Quantifier::maybe_many(url().into_shared()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

/// `<style>` markup span set of a note.
pub fn note_style() -> TagSpec {
    let range = TagSpec::new("NoteRange")
        .with_attr("start", AttrType::Integer)
        .with_attr("end", AttrType::Integer);

    TagSpec::new("NoteStyle")
        .with_attrs(["name", "value"])
        .with_tag("range", Quantifier::one_or_more(range.into_shared()))
}

pub fn note() -> TagSpec {
    primary_object("Note")
        .with_attr("type", AttrType::String)
        .with_attr("format", AttrType::Boolean)
        .with_tag("text", Quantifier::one(text()))
        .with_tag("style", Quantifier::maybe_many(note_style().into_shared()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
}

pub fn citation() -> TagSpec {
    primary_object("Citation")
        .with_tag("page", Quantifier::maybe_one(text()))
        .with_tag("confidence", Quantifier::one(text()))
        .with_tag("noteref", Quantifier::maybe_many(reference()))
        .with_tag("objref", Quantifier::maybe_many(object_ref().into_shared()))
        .with_tag("srcattribute", Quantifier::maybe_many(attribute().into_shared()))
        .with_tag("sourceref", Quantifier::one(reference()))
        .with_tag("tagref", Quantifier::maybe_many(reference()))
        .with_contributor(date())
}

/// `<bookmark target="person" hlink=".."/>`, keyed by the bookmarked id.
pub fn bookmark() -> TagSpec {
    TagSpec::reference("Bookmark").with_attr("target", AttrType::String)
}

pub fn name_map() -> TagSpec {
    TagSpec::new("NameMap").with_attrs(["type", "key", "value"])
}

pub fn name_format() -> TagSpec {
    TagSpec::new("NameFormat")
        .with_attrs(["number", "name", "fmt_str"])
        .with_attr("active", AttrType::Boolean)
}
