//! Attribute macros for `grf-bench-core`.
//!
//! Both `Metric` and `Aggregate` require the same set of serde and comparison
//! traits. These attributes derive them so implementors only write the logic.
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{ItemStruct, parse_macro_input};

extern crate proc_macro;

fn required_derives() -> TokenStream2 {
    quote! {
        #[derive(
            ::serde::Serialize,
            ::serde::Deserialize,
            ::std::cmp::PartialOrd,
            ::std::cmp::PartialEq,
            ::std::fmt::Debug,
            ::std::clone::Clone
        )]
    }
}

/// Derive the traits required by `Metric` and implement it for the struct.
///
/// ```rust,ignore
/// #[metric]
/// pub struct Latency(std::time::Duration);
/// ```
#[proc_macro_attribute]
pub fn metric(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as ItemStruct);
    let ident = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let derives = required_derives();
    let expanded = quote! {
        #derives
        #ast

        impl #impl_generics ::grf_bench_core::Metric for #ident #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}

/// Derive the traits required by `Aggregate`.
///
/// The `Aggregate` impl itself is left to the user since it carries the
/// collection logic.
#[proc_macro_attribute]
pub fn aggregate(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(item as ItemStruct);
    let derives = required_derives();
    let expanded = quote! {
        #derives
        #ast
    };

    TokenStream::from(expanded)
}
