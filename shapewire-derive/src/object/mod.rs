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
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields};

use crate::util::{add_trait_bounds, error, parse_wire_attrs, WireAttrs};

mod enumeration;
mod record;
mod union;

/// The four walks of one type, as token streams for the `Serializer` impl.
struct Walks {
    allocates: TokenStream,
    top_level: bool,
    shape: TokenStream,
    write: TokenStream,
    read: TokenStream,
    release: Option<TokenStream>,
}

pub fn derive_serializer(ast: &DeriveInput) -> TokenStream {
    match try_derive(ast) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn try_derive(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let attrs = parse_wire_attrs(ast)?;
    let mut extra = TokenStream::new();
    let walks = match &ast.data {
        Data::Struct(s) => match (&attrs, &s.fields) {
            (WireAttrs { with: Some(hook), .. }, fields) => record::hooked(hook, fields),
            (WireAttrs { open: true, .. }, Fields::Unnamed(fields)) => record::open_enum(fields)?,
            (WireAttrs { open: true, .. }, _) => {
                return Ok(error(
                    ast.ident.span(),
                    "`#[wire(open)]` needs a tuple struct around one integer",
                ))
            }
            (_, fields) => record::record(fields),
        },
        Data::Enum(e) => {
            let fieldless = e.variants.iter().all(|v| matches!(v.fields, Fields::Unit));
            if attrs.error_set {
                if !fieldless {
                    return Ok(error(ast.ident.span(), "error sets cannot carry data"));
                }
                extra = enumeration::error_set_impl(ast, e);
                enumeration::error_set()
            } else if fieldless {
                enumeration::exhaustive(ast, e)?
            } else {
                union::tagged(ast, e)?
            }
        }
        Data::Union(u) => {
            return Ok(error(
                u.union_token.span(),
                "untagged unions have no wire shape",
            ))
        }
    };

    let name = &ast.ident;
    let generics = add_trait_bounds(ast.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let Walks {
        allocates,
        top_level,
        shape,
        write,
        read,
        release,
    } = walks;
    let top_level_ts = if top_level {
        quote! {}
    } else {
        quote! { const WIRE_TOP_LEVEL: bool = false; }
    };
    let release_ts = release.map(|body| {
        quote! {
            #[allow(unused_variables)]
            fn wire_release(self, allocator: &dyn ::shapewire_core::alloc::Allocator) {
                #body
            }
        }
    });

    Ok(quote! {
        #extra

        impl #impl_generics ::shapewire_core::serializer::Serializer for #name #ty_generics #where_clause {
            const WIRE_ALLOCATES: bool = #allocates;
            #top_level_ts

            fn wire_shape() -> ::shapewire_core::shape::Shape {
                #shape
            }

            #[inline]
            fn wire_write(
                &self,
                context: &mut ::shapewire_core::resolver::context::WriteContext<'_>,
            ) -> ::std::result::Result<(), ::shapewire_core::error::Error> {
                #write
            }

            #[inline]
            fn wire_read(
                context: &mut ::shapewire_core::resolver::context::ReadContext<'_>,
            ) -> ::std::result::Result<Self, ::shapewire_core::error::Error> {
                #read
            }

            #release_ts
        }
    })
}
