//! Request/response pairs of a service interface.

use crate::base::Config;
use crate::hir::{Field, Interface, Method, Struct, TypeModel};

/// Request and response structs of one interface method.
#[derive(Clone, Copy, Debug)]
pub struct RequestResponse<'a> {
    pub method: &'a Method,
    pub request: Option<&'a Struct>,
    pub response: Option<&'a Struct>,
}

impl<'a> RequestResponse<'a> {
    /// The structs of the pair, request first
    pub fn structs(&self) -> impl Iterator<Item = &'a Struct> {
        self.request.into_iter().chain(self.response)
    }
}

/// Pair every method of `iface` with the request and response structs it
/// takes and returns.
///
/// The request is the first parameter whose type name ends with the request
/// suffix, the response the first result whose type name ends with the
/// response suffix. Both must be declared in the model's own package.
/// Methods with neither are left out.
pub fn request_response_pairs<'a>(
    model: &'a TypeModel,
    iface: &'a Interface,
    config: &Config,
) -> Vec<RequestResponse<'a>> {
    iface
        .methods
        .iter()
        .filter_map(|method| {
            let request = first_with_suffix(model, method.params(), &config.request_suffix);
            let response = first_with_suffix(model, method.results(), &config.response_suffix);
            if request.is_none() && response.is_none() {
                return None;
            }
            Some(RequestResponse {
                method,
                request,
                response,
            })
        })
        .collect()
}

fn first_with_suffix<'a>(model: &'a TypeModel, fields: &[Field], suffix: &str) -> Option<&'a Struct> {
    let ty = fields
        .iter()
        .map(|f| &f.ty)
        .find(|ty| ty.is_struct() && ty.name().is_some_and(|name| name.ends_with(suffix)))?;
    if ty
        .qualifier
        .as_deref()
        .is_some_and(|qualifier| qualifier != model.package_name())
    {
        return None;
    }
    model.struct_by_name(ty.name()?)
}
