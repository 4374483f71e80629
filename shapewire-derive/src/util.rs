// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    parse_quote, DataEnum, DeriveInput, Expr, ExprLit, ExprUnary, Field, Fields, Generics, Ident,
    Lit, Member, Type, UnOp,
};

/// Source field in declaration order, with the local name used for it in
/// generated code.
pub struct SourceField<'a> {
    pub member: Member,
    pub field: &'a Field,
    pub binding: Ident,
}

impl SourceField<'_> {
    pub fn ty(&self) -> &Type {
        &self.field.ty
    }
}

/// Returns the fields of a struct or variant in declaration order. The wire
/// order is the declaration order.
pub fn source_fields(fields: &Fields) -> Vec<SourceField<'_>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| SourceField {
            member: match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(idx.into()),
            },
            field,
            binding: format_ident!("__field{}", idx),
        })
        .collect()
}

/// Builds `Self`, `Self(..)` or `Self { .. }` (or a variant path) from the
/// fields' bindings.
pub fn construction(path: TokenStream, fields: &Fields, values: &[TokenStream]) -> TokenStream {
    match fields {
        Fields::Unit => path,
        Fields::Unnamed(_) => quote! { #path( #(#values),* ) },
        Fields::Named(named) => {
            let names = named.named.iter().map(|f| &f.ident);
            quote! { #path { #(#names: #values),* } }
        }
    }
}

/// Destructuring pattern binding every field to its generated name.
pub fn pattern(path: TokenStream, source_fields: &[SourceField]) -> TokenStream {
    let bindings: Vec<_> = source_fields.iter().map(|f| &f.binding).collect();
    match source_fields.first().map(|f| &f.member) {
        None => quote! { #path },
        Some(Member::Unnamed(_)) => quote! { #path( #(#bindings),* ) },
        Some(Member::Named(_)) => {
            let members = source_fields.iter().map(|f| &f.member);
            quote! { #path { #(#members: #bindings),* } }
        }
    }
}

/// Options from `#[wire(...)]` on the type.
#[derive(Default)]
pub struct WireAttrs {
    pub error_set: bool,
    pub open: bool,
    pub with: Option<syn::Path>,
}

pub fn parse_wire_attrs(ast: &DeriveInput) -> syn::Result<WireAttrs> {
    let mut attrs = WireAttrs::default();
    for attr in &ast.attrs {
        if !attr.path().is_ident("wire") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("error_set") {
                attrs.error_set = true;
            } else if nested.path.is_ident("open") {
                attrs.open = true;
            } else if nested.path.is_ident("with") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                attrs.with = Some(lit.parse()?);
            } else {
                return Err(nested.error("unknown wire attribute"));
            }
            Ok(())
        })?;
    }
    Ok(attrs)
}

/// Width and signedness of a primitive integer type name. Platform-native
/// integers are 64 bits on the wire.
pub fn int_width(name: &str) -> Option<(u16, bool)> {
    Some(match name {
        "u8" => (8, false),
        "u16" => (16, false),
        "u32" => (32, false),
        "u64" | "usize" => (64, false),
        "u128" => (128, false),
        "i8" => (8, true),
        "i16" => (16, true),
        "i32" => (32, true),
        "i64" | "isize" => (64, true),
        "i128" => (128, true),
        _ => return None,
    })
}

pub fn int_type_width(ty: &Type) -> Option<(u16, bool)> {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            int_width(&path.path.get_ident()?.to_string())
        }
        _ => None,
    }
}

/// Backing integer from `#[repr(..)]`, if any.
pub fn repr_int(ast: &DeriveInput) -> syn::Result<Option<(u16, bool)>> {
    let mut found = None;
    for attr in &ast.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if let Some(ident) = nested.path.get_ident() {
                if let Some(width) = int_width(&ident.to_string()) {
                    found = Some(width);
                }
            }
            // repr(align(..)) and friends carry a parenthesized argument.
            if nested.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in nested.input);
            }
            Ok(())
        })?;
    }
    Ok(found)
}

fn literal_value(expr: &Expr) -> Option<i128> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(int), ..
        }) => int.base10_parse::<i128>().ok(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => literal_value(expr).map(|v| -v),
        Expr::Group(group) => literal_value(&group.expr),
        Expr::Paren(paren) => literal_value(&paren.expr),
        _ => None,
    }
}

/// Discriminant of every variant: explicit integer literals are honoured,
/// implicit ones continue from the previous value.
pub fn discriminants(data: &DataEnum) -> syn::Result<Vec<i128>> {
    let mut next = 0i128;
    let mut values = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        let value = match &variant.discriminant {
            Some((_, expr)) => literal_value(expr).ok_or_else(|| {
                syn::Error::new(expr.span(), "discriminant must be an integer literal")
            })?,
            None => next,
        };
        values.push(value);
        next = value + 1;
    }
    Ok(values)
}

/// Narrowest backing integer holding every value; signed only when a value is
/// negative.
pub fn narrowest(values: &[i128]) -> (u16, bool) {
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let signed = min < 0;
    for bits in [8u16, 16, 32, 64] {
        let fits = if signed {
            let half = 1i128 << (bits - 1);
            min >= -half && max < half
        } else {
            max < 1i128 << bits
        };
        if fits {
            return (bits, signed);
        }
    }
    (128, signed)
}

/// Backing width of an enumeration or union tag: `#[repr]` if present,
/// otherwise the narrowest fit.
pub fn tag_width(ast: &DeriveInput, values: &[i128]) -> syn::Result<(u16, bool)> {
    Ok(match repr_int(ast)? {
        Some(width) => width,
        None => narrowest(values),
    })
}

/// Adds a `Serializer` bound to every type parameter.
pub fn add_trait_bounds(mut generics: Generics) -> Generics {
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(parse_quote!(::shapewire_core::serializer::Serializer));
    }
    generics
}

pub fn error(span: Span, message: &str) -> TokenStream {
    syn::Error::new(span, message).to_compile_error()
}
