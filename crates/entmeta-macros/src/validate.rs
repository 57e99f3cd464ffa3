//! Compile-time validation for the Entity and Enumeration derive macros.
//!
//! Validation collects every problem it finds and reports them together,
//! each pointing at the offending source location.

use std::collections::HashSet;

use syn::Error;

use crate::parse::{EntityDef, EnumDef};

fn combine(mut errors: Vec<Error>) -> Result<(), Error> {
    if errors.is_empty() {
        return Ok(());
    }
    let mut combined = errors.remove(0);
    for err in errors {
        combined.combine(err);
    }
    Err(combined)
}

/// Validate a parsed entity definition.
pub fn validate_entity(entity: &EntityDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_no_generics(&entity.generics, "Entity", &mut errors);
    validate_parent(entity, &mut errors);
    validate_field_flags(entity, &mut errors);
    validate_unique_accessors(entity, &mut errors);

    combine(errors)
}

/// Validate a parsed enumeration definition.
pub fn validate_enumeration(def: &EnumDef) -> Result<(), Error> {
    let mut errors = Vec::new();

    validate_no_generics(&def.generics, "Enumeration", &mut errors);

    if def.variants.is_empty() {
        errors.push(Error::new(
            def.ident.span(),
            "Enumeration requires at least one variant",
        ));
    }

    let mut seen = HashSet::new();
    for (ident, case_name) in &def.variants {
        if !seen.insert(case_name.as_str()) {
            errors.push(Error::new(
                ident.span(),
                format!("duplicate enumeration case name '{case_name}'"),
            ));
        }
    }

    combine(errors)
}

fn validate_no_generics(generics: &syn::Generics, derive: &str, errors: &mut Vec<Error>) {
    if !generics.params.is_empty() {
        errors.push(Error::new_spanned(
            generics,
            format!("{derive} cannot be derived for generic types"),
        ));
    }
}

/// `extends` and a single `parent` field go together.
fn validate_parent(entity: &EntityDef, errors: &mut Vec<Error>) {
    let parents: Vec<_> = entity.fields.iter().filter(|f| f.parent).collect();

    if parents.len() > 1 {
        for extra in &parents[1..] {
            errors.push(Error::new(
                extra.name.span(),
                "only one `#[entmeta(parent)]` field is allowed",
            ));
        }
    }

    match (&entity.extends, parents.first()) {
        (Some(path), None) => errors.push(Error::new_spanned(
            path,
            "`extends` requires a `#[entmeta(parent)]` field embedding the supertype",
        )),
        (None, Some(parent)) => errors.push(Error::new(
            parent.name.span(),
            "`#[entmeta(parent)]` requires `#[entmeta(extends = ...)]` on the struct",
        )),
        _ => {}
    }
}

/// Reject flag combinations that cannot mean anything.
fn validate_field_flags(entity: &EntityDef, errors: &mut Vec<Error>) {
    for field in &entity.fields {
        let conflict = if field.parent && (field.id || field.sealed || !field.annotations.is_empty()) {
            Some("`parent` cannot be combined with member attributes")
        } else if field.parent && field.skip {
            Some("cannot use both `skip` and `parent` on the same field")
        } else if field.skip && field.id {
            Some("cannot use both `skip` and `id` on the same field")
        } else {
            None
        };

        if let Some(message) = conflict {
            errors.push(Error::new(field.name.span(), message));
        }
    }
}

fn validate_unique_accessors(entity: &EntityDef, errors: &mut Vec<Error>) {
    let mut seen = HashSet::new();
    for accessor in &entity.accessors {
        if !seen.insert(accessor.method.to_string()) {
            errors.push(Error::new(
                accessor.method.span(),
                format!("duplicate accessor '{}'", accessor.method),
            ));
        }
    }
}
