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

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::spanned::Spanned;
use syn::{Fields, FieldsUnnamed};

use super::Walks;
use crate::util::{construction, int_type_width, source_fields, SourceField};

pub(super) fn field_allocates(fields: &[SourceField]) -> TokenStream {
    let tys = fields.iter().map(|f| f.ty());
    quote! {
        false #(| <#tys as ::shapewire_core::serializer::Serializer>::WIRE_ALLOCATES)*
    }
}

pub(super) fn field_shapes(fields: &[SourceField]) -> TokenStream {
    let tys = fields.iter().map(|f| f.ty());
    quote! {
        ::std::vec![#(<#tys as ::shapewire_core::serializer::Serializer>::wire_shape()),*]
    }
}

/// Reads every field into a `Partial`, so a failure part way releases the
/// fields already decoded, then builds the value with `path`.
pub(super) fn read_fields(path: TokenStream, fields: &Fields, source: &[SourceField]) -> TokenStream {
    let reads = source.iter().map(|f| {
        let binding = &f.binding;
        let ty = f.ty();
        quote! {
            let #binding = ::shapewire_core::serializer::Partial::<#ty>::read(context)?;
        }
    });
    let values: Vec<_> = source
        .iter()
        .map(|f| {
            let binding = &f.binding;
            quote! { #binding.into_inner() }
        })
        .collect();
    let built = construction(path, fields, &values);
    quote! {
        #(#reads)*
        ::std::result::Result::Ok(#built)
    }
}

pub(super) fn write_bindings(source: &[SourceField]) -> TokenStream {
    let bindings = source.iter().map(|f| &f.binding);
    quote! {
        #(::shapewire_core::serializer::Serializer::wire_write(#bindings, context)?;)*
    }
}

pub(super) fn release_bindings(source: &[SourceField]) -> TokenStream {
    let bindings = source.iter().map(|f| &f.binding);
    quote! {
        #(::shapewire_core::serializer::Serializer::wire_release(#bindings, allocator);)*
    }
}

/// A struct as a record of its fields in declaration order.
pub(super) fn record(fields: &Fields) -> Walks {
    let source = source_fields(fields);
    let members: Vec<_> = source.iter().map(|f| &f.member).collect();
    Walks {
        allocates: field_allocates(&source),
        top_level: true,
        shape: {
            let shapes = field_shapes(&source);
            quote! { ::shapewire_core::shape::Shape::record(#shapes) }
        },
        write: quote! {
            #(::shapewire_core::serializer::Serializer::wire_write(&self.#members, context)?;)*
            ::std::result::Result::Ok(())
        },
        read: read_fields(quote! { Self }, fields, &source),
        release: Some(quote! {
            #(::shapewire_core::serializer::Serializer::wire_release(self.#members, allocator);)*
        }),
    }
}

/// A record whose encode and decode are handed to `hook::write` and
/// `hook::read`. The hook owns the wire form and makes no tracked
/// allocations.
pub(super) fn hooked(hook: &syn::Path, fields: &Fields) -> Walks {
    let source = source_fields(fields);
    let shapes = field_shapes(&source);
    let hook_name = hook
        .to_token_stream()
        .to_string()
        .replace(' ', "");
    Walks {
        allocates: quote! { false },
        top_level: true,
        shape: quote! {
            ::shapewire_core::shape::Shape::hooked_record(#shapes, #hook_name)
        },
        write: quote! { #hook::write(self, context) },
        read: quote! { #hook::read(context) },
        release: None,
    }
}

/// `#[wire(open)] struct Code(u16);` as a non-exhaustive enumeration backed
/// by the wrapped integer.
pub(super) fn open_enum(fields: &FieldsUnnamed) -> syn::Result<Walks> {
    let inner = match fields.unnamed.first() {
        Some(field) if fields.unnamed.len() == 1 => &field.ty,
        _ => {
            return Err(syn::Error::new(
                fields.span(),
                "`#[wire(open)]` needs exactly one integer field",
            ))
        }
    };
    let (bits, signed) = int_type_width(inner)
        .ok_or_else(|| syn::Error::new(inner.span(), "open enumerations wrap a primitive integer"))?;
    Ok(Walks {
        allocates: quote! { false },
        top_level: true,
        shape: quote! {
            ::shapewire_core::shape::Shape::Enum(
                ::shapewire_core::shape::EnumShape::open(#bits, #signed)
            )
        },
        write: quote! {
            ::shapewire_core::serializer::enum_::write_tag(self.0 as i128, #bits, context)
        },
        read: quote! {
            let value = ::shapewire_core::serializer::enum_::read_tag(#bits, #signed, context)?;
            ::std::result::Result::Ok(Self(value as #inner))
        },
        release: None,
    })
}
