//! Derive/attribute macros for `smb-dtyp`.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, ItemStruct, Type, parse_macro_input};

/// Wraps a plain field-list struct with [`modular_bitfield::bitfield`], and implements
/// `binrw::BinRead`/`BinWrite` for it by reading/writing the fixed-size byte array the
/// bitfield is packed into.
///
/// Field types are expected to be `bool` (1 bit) or one of `modular_bitfield`'s `B1..B127`
/// placeholder types (N bits, as named). The total bit width of all fields (including
/// `#[skip]` padding fields) must be a multiple of 8, same as any `#[bitfield]` struct.
#[proc_macro_attribute]
pub fn mbitfield(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item_struct = parse_macro_input!(item as ItemStruct);
    let name = &item_struct.ident;
    let vis = &item_struct.vis;

    let fields = match &item_struct.fields {
        Fields::Named(f) => f,
        _ => {
            return syn::Error::new_spanned(&item_struct, "mbitfield requires named fields")
                .to_compile_error()
                .into();
        }
    };

    let total_bits: u32 = fields
        .named
        .iter()
        .map(|f| bit_width_of(&f.ty))
        .sum();

    if total_bits % 8 != 0 {
        return syn::Error::new_spanned(
            &item_struct,
            format!("mbitfield struct `{name}` is not byte-aligned ({total_bits} bits)"),
        )
        .to_compile_error()
        .into();
    }
    let bytes = (total_bits / 8) as usize;
    let array_len = syn::Index::from(bytes);

    let expanded = quote! {
        #[::modular_bitfield::bitfield]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        #vis struct #name {
            #fields
        }

        impl ::binrw::BinRead for #name {
            type Args<'a> = ();

            fn read_options<R: ::binrw::io::Read + ::binrw::io::Seek>(
                reader: &mut R,
                _endian: ::binrw::Endian,
                _args: Self::Args<'_>,
            ) -> ::binrw::BinResult<Self> {
                let mut buf = [0u8; #array_len];
                reader.read_exact(&mut buf)?;
                Ok(#name::from_bytes(buf))
            }
        }

        impl ::binrw::BinWrite for #name {
            type Args<'a> = ();

            fn write_options<W: ::binrw::io::Write + ::binrw::io::Seek>(
                &self,
                writer: &mut W,
                _endian: ::binrw::Endian,
                _args: Self::Args<'_>,
            ) -> ::binrw::BinResult<()> {
                writer.write_all(&self.into_bytes())?;
                Ok(())
            }
        }
    };

    expanded.into()
}

/// Parses the bit width of a field type: `bool` is 1 bit, `B1..B127` are N bits.
fn bit_width_of(ty: &Type) -> u32 {
    if let Type::Path(p) = ty {
        if let Some(seg) = p.path.segments.last() {
            let ident = seg.ident.to_string();
            if ident == "bool" {
                return 1;
            }
            if let Some(n) = ident.strip_prefix('B') {
                if let Ok(n) = n.parse::<u32>() {
                    return n;
                }
            }
        }
    }
    panic!(
        "mbitfield: unsupported field type {}, expected `bool` or `B1..B127`",
        format_ident!("{:?}", ty)
    );
}
