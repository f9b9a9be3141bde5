//! Macro for declaring a family of file information classes.
//!
//! Each invocation declares two items from one list of short names:
//! - `$NameClass`, a plain discriminant enum (the wire-level "information class" selector),
//!   with `Information` appended to every variant so the names match MS-FSCC class names
//!   (e.g. `Basic` => `BasicInformation`).
//! - `$Name`, a value-carrying enum with the same variants, each wrapping the corresponding
//!   `File<Variant>Information` payload type. `$Name` implements [`FileInfoType`], and its
//!   `BinRead` impl takes the class as an import so the right variant can be parsed out of
//!   raw bytes without re-deriving the tag from the payload.

use binrw::prelude::*;

/// A family of file information payloads selectable by a wire-level class value.
pub trait FileInfoType: Sized {
    type Class: Copy + PartialEq;

    fn class(&self) -> Self::Class;
}

macro_rules! file_info_classes {
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant_vis:vis $variant:ident = $value:expr,
            )*
        }
    ) => {
        ::pastey::paste! {
            $(#[$meta])*
            #[binrw::binrw]
            #[brw(repr(u8))]
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            $vis enum [<$name Class>] {
                $(
                    $(#[$variant_meta])*
                    [<$variant Information>] = $value,
                )*
            }

            $(#[$meta])*
            #[derive(Debug, PartialEq, Eq)]
            $vis enum $name {
                $(
                    $(#[$variant_meta])*
                    [<$variant Information>]([<File $variant Information>]),
                )*
            }

            impl $crate::info_classes::FileInfoType for $name {
                type Class = [<$name Class>];

                fn class(&self) -> Self::Class {
                    match self {
                        $(
                            Self::[<$variant Information>](_) => [<$name Class>]::[<$variant Information>],
                        )*
                    }
                }
            }

            impl ::binrw::BinWrite for $name {
                type Args<'a> = ();

                fn write_options<W: ::binrw::io::Write + ::binrw::io::Seek>(
                    &self,
                    writer: &mut W,
                    endian: ::binrw::Endian,
                    _args: Self::Args<'_>,
                ) -> ::binrw::BinResult<()> {
                    match self {
                        $(
                            Self::[<$variant Information>](inner) => {
                                inner.write_options(writer, endian, ())
                            }
                        )*
                    }
                }
            }

            impl ::binrw::BinRead for $name {
                type Args<'a> = ([<$name Class>],);

                fn read_options<R: ::binrw::io::Read + ::binrw::io::Seek>(
                    reader: &mut R,
                    endian: ::binrw::Endian,
                    args: Self::Args<'_>,
                ) -> ::binrw::BinResult<Self> {
                    let (class,) = args;
                    match class {
                        $(
                            [<$name Class>]::[<$variant Information>] => Ok(Self::[<$variant Information>](
                                <[<File $variant Information>] as ::binrw::BinRead>::read_options(reader, endian, Default::default())?,
                            )),
                        )*
                    }
                }
            }
        }
    };
}

pub(crate) use file_info_classes;
