extern crate proc_macro;

use std::collections::HashMap;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{self, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, Ident, Lit, Variant};

const PROPERTY_TAG: u8 = 0x80;

///Turns a fieldless enum into an opcode table.
///
///Every variant needs an integer discriminant and exactly one of `#[method]`
///or `#[property]`. Method codes stay below `0x80`, property codes carry the
///`0x80` tag bit. The attribute argument names the generated trait holding one
///setter/getter pair per property. `OpKind` and `Value` must be in scope where
///the enum is declared.
#[proc_macro_attribute]
pub fn op_table(attributes: TokenStream, items: TokenStream) -> TokenStream {
    let accessors = syn::parse_macro_input!(attributes as Ident);
    let mut ast = syn::parse_macro_input!(items as DeriveInput);

    match impl_op_table(&accessors, &mut ast) {
	Err(e) => e.to_compile_error().into(),
	Ok(r) => r.into(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Method,
    Property,
}

struct Entry {
    ident: Ident,
    code: u8,
    kind: Kind,
}

fn snake_case(input: String) -> String {
    let mut indices: Vec<usize> = Vec::new();

    for (i, c) in input.chars().enumerate() {
	if i > 0 && c.is_ascii_uppercase() {
	    indices.push(i);
	}
    }

    let mut result = String::with_capacity(input.len() + indices.len());
    result.push_str(&input);
    let mut offset = 0;
    for i in indices {
	result.insert(i + offset, '_');
	offset += '_'.len_utf8();
    }
    result.make_ascii_lowercase();

    result
}

///`BezierCurveTo` -> `bezierCurveTo`, the name the drawing surface uses.
fn camel_case(input: String) -> String {
    let mut chars = input.chars();
    match chars.next() {
	Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
	None => String::new(),
    }
}

fn kind_of(attr: &Attribute) -> Option<Kind> {
    if attr.path.is_ident("method") {
	Some(Kind::Method)
    } else if attr.path.is_ident("property") {
	Some(Kind::Property)
    } else {
	None
    }
}

///Removes the kind attribute from the variant so the derives never see it.
fn consume_kind(variant: &mut Variant) -> syn::Result<Kind> {
    let (pos, kind) = variant.attrs.iter()
	.enumerate()
	.find_map(|(i, attr)| kind_of(attr).map(|kind| (i, kind)))
	.ok_or_else(|| syn::Error::new_spanned(&variant.ident, "expected #[method] or #[property]"))?;

    variant.attrs.remove(pos);

    if let Some(extra) = variant.attrs.iter().find(|attr| kind_of(attr).is_some()) {
	return Err(syn::Error::new_spanned(extra, "an opcode is either a method or a property"));
    }

    Ok(kind)
}

fn parse_code(variant: &Variant) -> syn::Result<u8> {
    match &variant.discriminant {
	Some((_, Expr::Lit(ExprLit { lit: Lit::Int(code), .. }))) => code.base10_parse(),
	_ => Err(syn::Error::new_spanned(&variant.ident, "opcodes need an integer discriminant")),
    }
}

fn parse_variants(tag: &mut DeriveInput) -> syn::Result<Vec<Entry>> {
    let data_enum = match &mut tag.data {
	Data::Enum(data_enum) => data_enum,
	_ => return Err(syn::Error::new_spanned(&tag.ident, "op_table must be used on an enum")),
    };

    let mut entries = Vec::new();
    let mut seen: HashMap<u8, Ident> = HashMap::new();

    for variant in data_enum.variants.iter_mut() {
	if !matches!(variant.fields, Fields::Unit) {
	    return Err(syn::Error::new_spanned(&variant.ident, "opcodes carry no fields"));
	}

	let kind = consume_kind(variant)?;
	let code = parse_code(variant)?;

	match kind {
	    Kind::Method if code & PROPERTY_TAG != 0 => {
		return Err(syn::Error::new_spanned(
		    &variant.ident,
		    format!("method code {:#04x} must be below {:#04x}", code, PROPERTY_TAG)));
	    },
	    Kind::Property if code & PROPERTY_TAG == 0 => {
		return Err(syn::Error::new_spanned(
		    &variant.ident,
		    format!("property code {:#04x} must carry the {:#04x} tag bit", code, PROPERTY_TAG)));
	    },
	    _ => (),
	}

	if let Some(other) = seen.insert(code, variant.ident.clone()) {
	    return Err(syn::Error::new_spanned(
		&variant.ident,
		format!("code {:#04x} is already taken by `{}`", code, other)));
	}

	entries.push(Entry {
	    ident: variant.ident.clone(),
	    code,
	    kind,
	});
    }

    Ok(entries)
}

fn impl_op_table(accessors: &Ident, tag: &mut DeriveInput) -> syn::Result<TokenStream2> {
    if !tag.generics.params.is_empty() {
	return Err(syn::Error::new_spanned(&tag.generics, "an opcode table takes no generics"));
    }

    let entries = parse_variants(tag)?;

    let enum_name = &tag.ident;
    let vis = &tag.vis;

    let idents: Vec<&Ident> = entries.iter().map(|e| &e.ident).collect();
    let codes: Vec<u8> = entries.iter().map(|e| e.code).collect();
    let names: Vec<String> = entries.iter().map(|e| camel_case(e.ident.to_string())).collect();
    let kinds = entries.iter().map(|e| match e.kind {
	Kind::Method => quote!(OpKind::Method),
	Kind::Property => quote!(OpKind::Property),
    });

    let methods = entries.iter()
	.filter(|e| e.kind == Kind::Method)
	.map(|e| &e.ident);
    let properties: Vec<&Ident> = entries.iter()
	.filter(|e| e.kind == Kind::Property)
	.map(|e| &e.ident)
	.collect();

    let getters: Vec<Ident> = properties.iter()
	.map(|ident| Ident::new(snake_case(ident.to_string()).as_str(), ident.span()))
	.collect();
    let setters: Vec<Ident> = getters.iter().map(|getter| format_ident!("set_{}", getter)).collect();

    let result = quote! {
	#tag

	impl #enum_name {
	    pub const ALL: &'static [#enum_name] = &[#(#enum_name::#idents),*];
	    pub const METHODS: &'static [#enum_name] = &[#(#enum_name::#methods),*];
	    pub const PROPERTIES: &'static [#enum_name] = &[#(#enum_name::#properties),*];

	    #[inline]
	    pub const fn code(self) -> u8 {
		self as u8
	    }

	    pub const fn kind(self) -> OpKind {
		match self {
		    #(#enum_name::#idents => #kinds,)*
		}
	    }

	    pub const fn name(self) -> &'static str {
		match self {
		    #(#enum_name::#idents => #names,)*
		}
	    }

	    pub const fn from_code(code: u8) -> Option<Self> {
		match code {
		    #(#codes => Some(#enum_name::#idents),)*
		    _ => None,
		}
	    }

	    pub fn from_name(name: &str) -> Option<Self> {
		match name {
		    #(#names => Some(#enum_name::#idents),)*
		    _ => None,
		}
	    }
	}

	#vis trait #accessors {
	    fn set_property(&mut self, op: #enum_name, value: Value);

	    fn property(&self, op: #enum_name) -> Option<&Value>;

	    #(
		fn #setters(&mut self, value: impl Into<Value>) {
		    self.set_property(#enum_name::#properties, value.into())
		}

		fn #getters(&self) -> Option<&Value> {
		    self.property(#enum_name::#properties)
		}
	    )*
	}
    };

    Ok(result)
}
