//! Procedural macros for gateway tool definitions.
//!
//! `#[tool]` leaves the annotated function untouched (apart from stripping the
//! `#[param]` markers) and emits a sibling `<fn>_binding()` constructor that
//! returns a `gateway_tools::ToolBinding` carrying the tool descriptor and a
//! handler that pulls each argument out of a `ToolArgs` set.

use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, FnArg, GenericArgument, Ident, ItemFn, LitStr, Pat, PatType, PathArguments, Type,
    parse_macro_input,
};

/// Marks a synchronous function as a gateway tool.
///
/// ```ignore
/// #[tool(name = "computer-use:think", description = "Capture a thought")]
/// pub fn think(#[param(description = "The thought to record")] thought: String) -> String {
///     thought
/// }
/// ```
///
/// Arguments annotated with `#[param(description = "...")]` are read from the
/// host's argument set by name (`rename = "..."` overrides the external name).
/// `String` arguments are required unless they carry `default = "..."`;
/// `Option<String>` arguments are optional. An unannotated first argument of
/// type `&Ctx` receives the registry context and fixes the binding type to
/// `ToolBinding<Ctx>`; without one the binding is generic over any context.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut properties = ToolProperties::default();
    let parser = syn::meta::parser(|meta| properties.parse(&meta));
    parse_macro_input!(attr with parser);

    let function = parse_macro_input!(item as ItemFn);
    expand(properties, function)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct ToolProperties {
    name: Option<LitStr>,
    description: Option<LitStr>,
}

impl ToolProperties {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("description") {
            self.description = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported tool property; expected `name` or `description`"))
        }
    }
}

enum ParamKind {
    Required,
    Defaulted(LitStr),
    Optional,
}

struct ToolParam {
    ident: Ident,
    external: LitStr,
    description: LitStr,
    kind: ParamKind,
}

fn expand(properties: ToolProperties, mut function: ItemFn) -> syn::Result<TokenStream2> {
    let name = properties.name.ok_or_else(|| {
        syn::Error::new(
            Span::call_site(),
            "missing `name = \"<namespace>:<verb>\"`",
        )
    })?;
    let description = properties
        .description
        .ok_or_else(|| syn::Error::new(Span::call_site(), "missing `description = \"...\"`"))?;

    if let Some(asyncness) = &function.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "tools are called synchronously; bridge async work inside the body",
        ));
    }
    if !function.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &function.sig.generics,
            "tools cannot be generic",
        ));
    }

    let mut context: Option<Type> = None;
    let mut params = Vec::new();

    for (position, input) in function.sig.inputs.iter_mut().enumerate() {
        let span = input.span();
        let FnArg::Typed(pat_type) = input else {
            return Err(syn::Error::new(span, "tools cannot take `self`"));
        };

        match take_param_attr(&mut pat_type.attrs) {
            Some(attr) => params.push(parse_param(pat_type, &attr)?),
            None if position == 0 => context = Some(context_type(pat_type)?),
            None => {
                return Err(syn::Error::new(
                    span,
                    "annotate tool arguments with `#[param(description = \"...\")]`",
                ));
            }
        }
    }

    let fn_ident = &function.sig.ident;
    let vis = &function.vis;
    let binding_ident = format_ident!("{}_binding", fn_ident);
    let binding_doc = format!("Registry binding for the `{}` tool.", name.value());

    let descriptors = params.iter().map(|param| {
        let external = &param.external;
        let description = &param.description;
        let required = matches!(param.kind, ParamKind::Required);
        quote! { ::gateway_tools::ParamDescriptor::new(#external, #description, #required) }
    });

    let extractions = params.iter().map(|param| {
        let ident = &param.ident;
        let external = &param.external;
        match &param.kind {
            ParamKind::Required => quote! {
                let #ident: ::std::string::String =
                    ::std::borrow::ToOwned::to_owned(__tool_args.required(#external)?);
            },
            ParamKind::Defaulted(default) => quote! {
                let #ident: ::std::string::String = ::std::borrow::ToOwned::to_owned(
                    __tool_args.get(#external).unwrap_or(#default),
                );
            },
            ParamKind::Optional => quote! {
                let #ident: ::std::option::Option<::std::string::String> =
                    __tool_args.get(#external).map(::std::borrow::ToOwned::to_owned);
            },
        }
    });

    let arg_idents: Vec<&Ident> = params.iter().map(|param| &param.ident).collect();

    let body = quote! {
        const PARAMETERS: &[::gateway_tools::ParamDescriptor] = &[#(#descriptors),*];
    };

    let binding = if let Some(context) = context {
        quote! {
            #[doc = #binding_doc]
            #[must_use]
            #vis fn #binding_ident() -> ::gateway_tools::ToolBinding<#context> {
                #body
                fn __invoke(
                    __tool_context: &#context,
                    __tool_args: &::gateway_tools::ToolArgs,
                ) -> ::gateway_tools::ToolResult<::std::string::String> {
                    #(#extractions)*
                    ::std::result::Result::Ok(#fn_ident(__tool_context, #(#arg_idents),*))
                }
                ::gateway_tools::ToolBinding::new(
                    ::gateway_tools::ToolDescriptor::new(#name, #description, PARAMETERS),
                    __invoke,
                )
            }
        }
    } else {
        quote! {
            #[doc = #binding_doc]
            #[must_use]
            #vis fn #binding_ident<C>() -> ::gateway_tools::ToolBinding<C> {
                #body
                fn __invoke<C>(
                    _: &C,
                    __tool_args: &::gateway_tools::ToolArgs,
                ) -> ::gateway_tools::ToolResult<::std::string::String> {
                    #(#extractions)*
                    ::std::result::Result::Ok(#fn_ident(#(#arg_idents),*))
                }
                ::gateway_tools::ToolBinding::new(
                    ::gateway_tools::ToolDescriptor::new(#name, #description, PARAMETERS),
                    __invoke::<C>,
                )
            }
        }
    };

    Ok(quote! {
        #function
        #binding
    })
}

fn take_param_attr(attrs: &mut Vec<Attribute>) -> Option<Attribute> {
    let position = attrs.iter().position(|attr| attr.path().is_ident("param"))?;
    Some(attrs.remove(position))
}

fn context_type(pat_type: &PatType) -> syn::Result<Type> {
    match &*pat_type.ty {
        Type::Reference(reference) if reference.mutability.is_none() => {
            Ok((*reference.elem).clone())
        }
        other => Err(syn::Error::new_spanned(
            other,
            "the context argument must be a shared reference such as `&Gateway`",
        )),
    }
}

fn parse_param(pat_type: &PatType, attr: &Attribute) -> syn::Result<ToolParam> {
    let Pat::Ident(pat_ident) = &*pat_type.pat else {
        return Err(syn::Error::new_spanned(
            &pat_type.pat,
            "tool arguments must be plain identifiers",
        ));
    };
    let ident = pat_ident.ident.clone();

    let mut description = None;
    let mut rename = None;
    let mut default = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("description") {
            description = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("rename") {
            rename = Some(meta.value()?.parse::<LitStr>()?);
        } else if meta.path.is_ident("default") {
            default = Some(meta.value()?.parse::<LitStr>()?);
        } else {
            return Err(meta.error(
                "unsupported param property; expected `description`, `rename`, or `default`",
            ));
        }
        Ok(())
    })?;

    let description = description
        .ok_or_else(|| syn::Error::new_spanned(attr, "missing `description = \"...\"`"))?;
    let external = rename.unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

    let kind = if is_option_string(&pat_type.ty) {
        if let Some(default) = default {
            return Err(syn::Error::new_spanned(
                default,
                "`default` cannot be combined with `Option<String>`",
            ));
        }
        ParamKind::Optional
    } else if is_string(&pat_type.ty) {
        default.map_or(ParamKind::Required, ParamKind::Defaulted)
    } else {
        return Err(syn::Error::new_spanned(
            &pat_type.ty,
            "tool arguments must be `String` or `Option<String>`",
        ));
    };

    Ok(ToolParam {
        ident,
        external,
        description,
        kind,
    })
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn is_string(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| {
        segment.ident == "String" && matches!(segment.arguments, PathArguments::None)
    })
}

fn is_option_string(ty: &Type) -> bool {
    let Some(segment) = last_segment(ty) else {
        return false;
    };
    if segment.ident != "Option" {
        return false;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return false;
    };
    matches!(
        arguments.args.first(),
        Some(GenericArgument::Type(inner)) if arguments.args.len() == 1 && is_string(inner)
    )
}
