/// Shared re-export of the minicbor lib across the workspace
pub use minicbor;

/// Round-trip friendly common helper structs
pub mod utils;

pub trait Fragment: Sized + for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> {}

impl<T> Fragment for T where T: for<'b> minicbor::Decode<'b, ()> + minicbor::Encode<()> + Sized {}

/// Derives a codec for an enum whose variants are distinguished by the cbor
/// data type of their payload.
///
/// Each `Type => Variant` arm maps one or more cbor data types to a
/// single-field variant. The optional trailing `(a, b => Variant)` arm maps a
/// cbor array to a tuple variant, decoding one field per identifier. Enums
/// with lifetime parameters write their codec by hand instead.
#[macro_export]
macro_rules! codec_by_datatype {
    (
        $name:ident,
        $( $( $dtype:ident )|* => $unary:ident ),*,
        ($( $( $field:ident ),+ => $tuple:ident )?)
    ) => {
        impl<'__b, C> minicbor::decode::Decode<'__b, C> for $name {
            fn decode(d: &mut minicbor::Decoder<'__b>, ctx: &mut C) -> Result<Self, minicbor::decode::Error> {
                match d.datatype()? {
                    $( minicbor::data::Type::Array => {
                        d.array()?;
                        Ok($name::$tuple($({ let $field = d.decode_with(ctx)?; $field }, )+ ))
                    }, )?
                    $( $( minicbor::data::Type::$dtype )|* => Ok($name::$unary(d.decode_with(ctx)?)), )*
                    _ => Err(minicbor::decode::Error::message(
                        concat!("unexpected cbor data type for ", stringify!($name)),
                    )),
                }
            }
        }

        impl<C> minicbor::encode::Encode<C> for $name {
            fn encode<W: minicbor::encode::Write>(
                &self,
                e: &mut minicbor::Encoder<W>,
                ctx: &mut C,
            ) -> Result<(), minicbor::encode::Error<W::Error>> {
                match self {
                    $( $name::$tuple($( $field ),+) => {
                        e.array(2)?;
                        $( e.encode_with($field, ctx)?; )+
                    }, )?
                    $( $name::$unary(inner) => {
                        e.encode_with(inner, ctx)?;
                    } )*
                };

                Ok(())
            }
        }
    }
}
