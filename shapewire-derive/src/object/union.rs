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
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

use super::enumeration::enum_shape;
use super::record::{field_allocates, field_shapes, read_fields, release_bindings, write_bindings};
use super::Walks;
use crate::util::{discriminants, pattern, source_fields, tag_width};

/// An enum with data-carrying variants as a tagged union. The tag is an
/// exhaustive enumeration of the variant names; a unit variant carries `()`,
/// a single-field tuple variant carries that field, and any other variant
/// carries a record of its fields.
pub(super) fn tagged(ast: &DeriveInput, data: &DataEnum) -> syn::Result<Walks> {
    let values = discriminants(data)?;
    let (bits, signed) = tag_width(ast, &values)?;
    let tag = enum_shape(data, &values, bits, signed);

    let mut allocates = Vec::new();
    let mut arms = Vec::new();
    let mut writes = Vec::new();
    let mut reads = Vec::new();
    let mut releases = Vec::new();

    for (variant, value) in data.variants.iter().zip(&values) {
        let ident = &variant.ident;
        let name = ident.to_string();
        let source = source_fields(&variant.fields);
        let path = quote! { Self::#ident };
        let pat = pattern(path.clone(), &source);

        allocates.push(field_allocates(&source));
        let arm_shape = match (&variant.fields, source.as_slice()) {
            (Fields::Unit, _) => quote! { ::shapewire_core::shape::Shape::Unit },
            (Fields::Unnamed(_), [only]) => {
                let ty = only.ty();
                quote! { <#ty as ::shapewire_core::serializer::Serializer>::wire_shape() }
            }
            _ => {
                let shapes = field_shapes(&source);
                quote! { ::shapewire_core::shape::Shape::record(#shapes) }
            }
        };
        arms.push(quote! { (#name, #arm_shape) });

        let write_fields = write_bindings(&source);
        writes.push(quote! {
            #pat => {
                ::shapewire_core::serializer::enum_::write_tag(#value, #bits, context)?;
                #write_fields
            }
        });

        let read_variant = read_fields(path, &variant.fields, &source);
        reads.push(quote! {
            #value => { #read_variant }
        });

        let release_fields = release_bindings(&source);
        releases.push(quote! {
            #pat => { #release_fields }
        });
    }

    Ok(Walks {
        allocates: quote! { false #(| #allocates)* },
        top_level: true,
        shape: quote! {
            ::shapewire_core::shape::Shape::Union {
                tag: #tag,
                arms: ::std::vec![#(#arms),*],
            }
        },
        write: quote! {
            match self {
                #(#writes)*
            }
            ::std::result::Result::Ok(())
        },
        read: quote! {
            match ::shapewire_core::serializer::enum_::read_tag(#bits, #signed, context)? {
                #(#reads)*
                other => ::std::result::Result::Err(
                    ::shapewire_core::serializer::enum_::unknown_value::<Self>(other)
                ),
            }
        },
        release: Some(quote! {
            match self {
                #(#releases)*
            }
        }),
    })
}
