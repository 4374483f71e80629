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
use syn::{DataEnum, DeriveInput};

use super::Walks;
use crate::util::{discriminants, tag_width};

/// Tokens for `EnumShape::exhaustive(..)` over the variant names and values.
pub(super) fn enum_shape(data: &DataEnum, values: &[i128], bits: u16, signed: bool) -> TokenStream {
    let names = data.variants.iter().map(|v| v.ident.to_string());
    quote! {
        ::shapewire_core::shape::EnumShape::exhaustive(
            #bits,
            #signed,
            ::std::vec![#((#names, #values)),*],
        )
    }
}

/// A fieldless enum as an exhaustive enumeration of its discriminants.
pub(super) fn exhaustive(ast: &DeriveInput, data: &DataEnum) -> syn::Result<Walks> {
    let values = discriminants(data)?;
    let (bits, signed) = tag_width(ast, &values)?;
    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let shape = enum_shape(data, &values, bits, signed);
    Ok(Walks {
        allocates: quote! { false },
        top_level: true,
        shape: quote! { ::shapewire_core::shape::Shape::Enum(#shape) },
        write: quote! {
            let value: i128 = match *self {
                #(Self::#idents => #values,)*
            };
            ::shapewire_core::serializer::enum_::write_tag(value, #bits, context)
        },
        read: quote! {
            match ::shapewire_core::serializer::enum_::read_tag(#bits, #signed, context)? {
                #(#values => ::std::result::Result::Ok(Self::#idents),)*
                other => ::std::result::Result::Err(
                    ::shapewire_core::serializer::enum_::unknown_value::<Self>(other)
                ),
            }
        },
        release: None,
    })
}

/// `Serializer` walks of an error set; the `ErrorSet` impl comes from
/// [`error_set_impl`].
pub(super) fn error_set() -> Walks {
    Walks {
        allocates: quote! { false },
        top_level: false,
        shape: quote! { ::shapewire_core::serializer::error_set::error_set_shape::<Self>() },
        write: quote! { ::shapewire_core::serializer::error_set::write_error(self, context) },
        read: quote! { ::shapewire_core::serializer::error_set::read_error(context) },
        release: None,
    }
}

pub(super) fn error_set_impl(ast: &DeriveInput, data: &DataEnum) -> TokenStream {
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let names: Vec<_> = idents.iter().map(|i| i.to_string()).collect();
    quote! {
        impl #impl_generics ::shapewire_core::serializer::ErrorSet for #name #ty_generics #where_clause {
            const NAMES: &'static [&'static str] = &[#(#names),*];

            fn name(&self) -> &'static str {
                match *self {
                    #(Self::#idents => #names,)*
                }
            }

            fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#names => ::std::option::Option::Some(Self::#idents),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    }
}
