use crate::parse::{Compound, KeyValuePair, Value};
use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};

pub fn gen_compound_expr(compound: &Compound) -> TokenStream {
    // Key lengths are checked while parsing, so only list homogeneity can fail at runtime
    let inserts = compound.iter().map(|KeyValuePair { key, value, .. }| {
        quote! {
            ::nbtkit::NbtCompound::insert(&mut __compound, #key, #value)
                .expect("compound! keys are at most 65535 bytes long");
        }
    });

    let capacity = Literal::usize_unsuffixed(compound.len());

    quote! {
        {
            let mut __compound = ::nbtkit::NbtCompound::with_capacity(#capacity);
            #( #inserts )*
            __compound
        }
    }
}

impl ToTokens for Value {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        match self {
            Value::Compound(compound) => tokens.extend(gen_compound_expr(compound)),
            Value::ByteArray(array) => {
                let iter = array.iter();
                tokens.extend(quote! {
                    { ::nbtkit::Payload::ByteArray(::std::vec![#( (#iter) as i8 ),*]) }
                })
            }
            Value::IntArray(array) => {
                let iter = array.iter();
                tokens.extend(quote! {
                    { ::nbtkit::Payload::IntArray(::std::vec![#( (#iter) as i32 ),*]) }
                })
            }
            Value::LongArray(array) => {
                let iter = array.iter();
                tokens.extend(quote! {
                    { ::nbtkit::Payload::LongArray(::std::vec![#( (#iter) as i64 ),*]) }
                })
            }
            Value::List(list) =>
                if list.is_empty() {
                    tokens.extend(quote! { ::nbtkit::NbtList::new() })
                } else {
                    let iter = list.iter();
                    tokens.extend(quote! {
                        {
                            ::nbtkit::NbtList::from_values(
                                ::std::vec![#( ::nbtkit::Payload::from(#iter) ),*]
                            )
                            .expect("compound! lists must hold a single payload type")
                        }
                    })
                },
            Value::Expr(expr) => expr.to_tokens(tokens),
        }
    }
}
