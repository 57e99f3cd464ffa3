//! Parsing logic for the Entity and Enumeration derive macros.
//!
//! This module extracts struct-level and field-level `#[entmeta(...)]`
//! attributes from the derive input to build `EntityDef` and `EnumDef`
//! structures used for code generation.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, LitStr, Path, Result,
    Type, Visibility,
};

/// Parsed annotation from `annotation = "Kind"` or
/// `annotation(kind = "Kind", key = "value", ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDef {
    /// Annotation kind name (e.g. `"Table"`).
    pub kind: String,
    /// Key/value attributes in declaration order.
    pub attributes: Vec<(String, String)>,
}

impl AnnotationDef {
    pub fn marker(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: Vec::new(),
        }
    }
}

/// Parsed `accessor(...)` entry from the struct attributes.
#[derive(Debug)]
pub struct AccessorDef {
    /// The inherent method to call (e.g. `get_code`).
    pub method: Ident,
    /// Declared return type, used for the descriptor.
    pub returns: Type,
    /// The method returns `Result<T, E>` rather than `T`.
    pub fallible: bool,
    /// Method-level annotations, including the identifier marker.
    pub annotations: Vec<AnnotationDef>,
}

/// Parsed entity definition from a struct with `#[derive(Entity)]`.
#[derive(Debug)]
pub struct EntityDef {
    /// The struct name (e.g., `Order`).
    pub ident: Ident,
    /// The descriptor name (defaults to the struct name).
    pub type_name: String,
    /// Generic parameters from the struct (must be empty).
    pub generics: Generics,
    /// Whether the descriptor is an abstract class.
    pub is_abstract: bool,
    /// Supertype path from `extends = Path`.
    pub extends: Option<Path>,
    /// Type-level annotations.
    pub annotations: Vec<AnnotationDef>,
    /// Declared accessors.
    pub accessors: Vec<AccessorDef>,
    /// Parsed field definitions.
    pub fields: Vec<FieldDef>,
}

/// Parsed field definition from a struct field.
#[derive(Debug)]
pub struct FieldDef {
    /// The Rust field name.
    pub name: Ident,
    /// The Rust type of the field.
    pub ty: Type,
    /// `pub` fields are readable without override.
    pub public: bool,
    /// Carries the identifier marker.
    pub id: bool,
    /// Embeds the supertype's state.
    pub parent: bool,
    /// Excluded from the descriptor entirely.
    pub skip: bool,
    /// Refuses reflective reads.
    pub sealed: bool,
    /// Additional member annotations.
    pub annotations: Vec<AnnotationDef>,
}

impl EntityDef {
    /// Fields that become descriptor members.
    pub fn member_fields(&self) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| !f.skip && !f.parent).collect()
    }

    /// The field embedding the supertype, if any.
    pub fn parent_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.parent)
    }
}

impl FieldDef {
    /// Member annotations, identifier marker first.
    pub fn all_annotations(&self) -> Vec<AnnotationDef> {
        let mut all = Vec::with_capacity(self.annotations.len() + 1);
        if self.id {
            all.push(AnnotationDef::marker("Id"));
        }
        all.extend(self.annotations.iter().cloned());
        all
    }
}

/// Parsed enumeration from an enum with `#[derive(Enumeration)]`.
#[derive(Debug)]
pub struct EnumDef {
    pub ident: Ident,
    pub type_name: String,
    pub generics: Generics,
    /// `(variant ident, case name)` pairs in declaration order.
    pub variants: Vec<(Ident, String)>,
}

/// Parse a `DeriveInput` into an `EntityDef`.
///
/// # Errors
///
/// Returns an error if:
/// - The input is not a struct
/// - The struct uses tuple or unit syntax (must have named fields)
/// - Unknown attributes are present
/// - Attribute values are invalid
pub fn parse_entity(input: &DeriveInput) -> Result<EntityDef> {
    let ident = input.ident.clone();

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not enums (use Enumeration)",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not unions",
            ));
        }
    };

    let StructAttrs {
        type_name,
        is_abstract,
        extends,
        annotations,
        accessors,
    } = parse_struct_attrs(&input.attrs)?;

    Ok(EntityDef {
        type_name: type_name.unwrap_or_else(|| ident.to_string()),
        ident,
        generics: input.generics.clone(),
        is_abstract,
        extends,
        annotations,
        accessors,
        fields,
    })
}

/// Parse a `DeriveInput` into an `EnumDef`.
pub fn parse_enumeration(input: &DeriveInput) -> Result<EnumDef> {
    let Data::Enum(data) = &input.data else {
        return Err(Error::new_spanned(
            input,
            "Enumeration can only be derived for enums",
        ));
    };

    let mut type_name = None;
    for attr in entmeta_attrs(&input.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                set_once(&mut type_name, parse_string(&meta, "name")?, &meta, "name")
            } else {
                Err(meta.error("unknown entmeta enum attribute (supported: name)"))
            }
        })?;
    }

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !variant.fields.is_empty() {
            return Err(Error::new_spanned(
                variant,
                "Enumeration variants must be unit variants (no fields)",
            ));
        }

        let mut rename = None;
        for attr in entmeta_attrs(&variant.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    set_once(&mut rename, parse_string(&meta, "rename")?, &meta, "rename")
                } else {
                    Err(meta.error("unknown entmeta variant attribute (supported: rename)"))
                }
            })?;
        }

        let case_name = rename.unwrap_or_else(|| variant.ident.to_string());
        variants.push((variant.ident.clone(), case_name));
    }

    Ok(EnumDef {
        type_name: type_name.unwrap_or_else(|| input.ident.to_string()),
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        variants,
    })
}

fn entmeta_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("entmeta"))
}

fn parse_string(meta: &ParseNestedMeta<'_>, key: &str) -> Result<String> {
    let value: Lit = meta.value()?.parse()?;
    if let Lit::Str(lit_str) = value {
        Ok(lit_str.value())
    } else {
        Err(Error::new_spanned(
            value,
            format!("expected string literal for {key}"),
        ))
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta<'_>, key: &str) -> Result<()> {
    if slot.is_some() {
        return Err(meta.error(format!("duplicate entmeta attribute: {key}")));
    }
    *slot = Some(value);
    Ok(())
}

/// Parse either `annotation = "Kind"` or `annotation(kind = "Kind", ...)`.
fn parse_annotation(meta: &ParseNestedMeta<'_>) -> Result<AnnotationDef> {
    if meta.input.peek(syn::Token![=]) {
        let kind: LitStr = meta.value()?.parse()?;
        validate_kind(&kind)?;
        return Ok(AnnotationDef::marker(&kind.value()));
    }

    let mut kind = None;
    let mut attributes = Vec::new();
    meta.parse_nested_meta(|nested| {
        let key = nested
            .path
            .get_ident()
            .ok_or_else(|| nested.error("expected a plain attribute key"))?
            .to_string();
        let value: LitStr = nested.value()?.parse()?;
        if key == "kind" {
            validate_kind(&value)?;
            set_once(&mut kind, value.value(), &nested, "kind")
        } else {
            attributes.push((key, value.value()));
            Ok(())
        }
    })?;

    let kind = kind.ok_or_else(|| meta.error("annotation(...) requires `kind = \"...\"`"))?;
    Ok(AnnotationDef { kind, attributes })
}

fn validate_kind(kind: &LitStr) -> Result<()> {
    if kind.value().trim().is_empty() {
        return Err(Error::new_spanned(kind, "annotation kind cannot be empty"));
    }
    Ok(())
}

/// Parse `accessor(method = "...", returns = Type, fallible, id, annotation = "...")`.
fn parse_accessor(meta: &ParseNestedMeta<'_>) -> Result<AccessorDef> {
    let mut method: Option<Ident> = None;
    let mut returns: Option<Type> = None;
    let mut fallible = false;
    let mut annotations = Vec::new();

    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("method") {
            let lit: LitStr = nested.value()?.parse()?;
            let ident = lit.parse::<Ident>().map_err(|_| {
                Error::new_spanned(&lit, "accessor method must be a plain identifier")
            })?;
            set_once(&mut method, ident, &nested, "method")
        } else if nested.path.is_ident("returns") {
            let ty: Type = nested.value()?.parse()?;
            set_once(&mut returns, ty, &nested, "returns")
        } else if nested.path.is_ident("fallible") {
            fallible = true;
            Ok(())
        } else if nested.path.is_ident("id") {
            annotations.insert(0, AnnotationDef::marker("Id"));
            Ok(())
        } else if nested.path.is_ident("annotation") {
            annotations.push(parse_annotation(&nested)?);
            Ok(())
        } else {
            Err(nested.error(
                "unknown entmeta accessor attribute (supported: method, returns, fallible, id, annotation)",
            ))
        }
    })?;

    let method = method.ok_or_else(|| meta.error("accessor(...) requires `method = \"...\"`"))?;
    let returns = returns.ok_or_else(|| meta.error("accessor(...) requires `returns = Type`"))?;

    Ok(AccessorDef {
        method,
        returns,
        fallible,
        annotations,
    })
}

/// Parsed struct-level attributes result.
struct StructAttrs {
    type_name: Option<String>,
    is_abstract: bool,
    extends: Option<Path>,
    annotations: Vec<AnnotationDef>,
    accessors: Vec<AccessorDef>,
}

/// Parse struct-level `#[entmeta(...)]` attributes.
///
/// Supported keys:
/// - `name = "..."` (overrides the descriptor name)
/// - `abstract` (descriptor is an abstract class)
/// - `extends = Path` (supertype; needs a `parent` field)
/// - `annotation = "Kind"` / `annotation(kind = "Kind", key = "value")`
/// - `accessor(...)`
fn parse_struct_attrs(attrs: &[Attribute]) -> Result<StructAttrs> {
    let mut type_name = None;
    let mut is_abstract = false;
    let mut extends = None;
    let mut annotations = Vec::new();
    let mut accessors = Vec::new();

    for attr in entmeta_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                set_once(&mut type_name, parse_string(&meta, "name")?, &meta, "name")
            } else if meta.path.is_ident("abstract") {
                is_abstract = true;
                Ok(())
            } else if meta.path.is_ident("extends") {
                let path: Path = meta.value()?.parse()?;
                set_once(&mut extends, path, &meta, "extends")
            } else if meta.path.is_ident("annotation") {
                annotations.push(parse_annotation(&meta)?);
                Ok(())
            } else if meta.path.is_ident("accessor") {
                accessors.push(parse_accessor(&meta)?);
                Ok(())
            } else {
                Err(meta.error(
                    "unknown entmeta struct attribute (supported: name, abstract, extends, \
                     annotation, accessor)",
                ))
            }
        })?;
    }

    Ok(StructAttrs {
        type_name,
        is_abstract,
        extends,
        annotations,
        accessors,
    })
}

/// Parse all fields from a struct.
fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "Entity requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Parse a single field and its attributes.
fn parse_field(field: &Field) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut def = FieldDef {
        name,
        ty: field.ty.clone(),
        public: matches!(field.vis, Visibility::Public(_)),
        id: false,
        parent: false,
        skip: false,
        sealed: false,
        annotations: Vec::new(),
    };

    for attr in entmeta_attrs(&field.attrs) {
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("id") {
                def.id = true;
            } else if path.is_ident("parent") {
                def.parent = true;
            } else if path.is_ident("skip") {
                def.skip = true;
            } else if path.is_ident("sealed") {
                def.sealed = true;
            } else if path.is_ident("annotation") {
                def.annotations.push(parse_annotation(&meta)?);
            } else {
                return Err(meta.error(
                    "unknown entmeta field attribute (supported: id, parent, skip, sealed, annotation)",
                ));
            }
            Ok(())
        })?;
    }

    Ok(def)
}
