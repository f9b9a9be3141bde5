//! [`PosMarker<T>`]: a placeholder value that remembers the stream position it occupies,
//! so a later field in the same struct can patch it with an offset or size computed once
//! that later field has been (or is about to be) written.
//!
//! This is the standard trick for encoding self-referential offset/length pairs (as MS-SMB2
//! and MS-FSCC wire formats do constantly) without a two-pass writer: write a zeroed
//! placeholder now, remember where it went, and seek back to patch it once the real value
//! is known.

use binrw::prelude::*;
use binrw::{BinResult, Endian};
use std::cell::Cell;
use std::io::{Read, Seek, SeekFrom, Write};

#[derive(Debug, Clone)]
pub struct PosMarker<T> {
    pub value: T,
    pos: Cell<u64>,
}

impl<T: Default> Default for PosMarker<T> {
    fn default() -> Self {
        PosMarker {
            value: T::default(),
            pos: Cell::new(0),
        }
    }
}

impl<T: PartialEq> PartialEq for PosMarker<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<T: Eq> Eq for PosMarker<T> {}

impl<T> PosMarker<T> {
    pub fn new(value: T) -> Self {
        PosMarker {
            value,
            pos: Cell::new(0),
        }
    }

    /// The stream position at which this marker's bytes were read or written.
    pub fn pos(&self) -> u64 {
        self.pos.get()
    }

    /// `SeekFrom::Start(self.pos() + extra)` - used to follow a relative offset stored
    /// elsewhere in the message, where `extra` has already been adjusted for the distance
    /// between this marker and whatever position the stored offset is relative to.
    pub fn seek_from(&self, extra: u64) -> SeekFrom {
        SeekFrom::Start(self.pos() + extra)
    }

    /// As [`Self::seek_from`], but a no-op seek (stay in place) when `cond` is false - for
    /// optional trailing fields whose offset is meaningless when absent.
    pub fn seek_from_if(&self, extra: u64, cond: bool) -> SeekFrom {
        if cond {
            self.seek_from(extra)
        } else {
            SeekFrom::Current(0)
        }
    }
}

impl<T: BinRead<Args<'static> = ()>> BinRead for PosMarker<T> {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let value = T::read_options(reader, endian, ())?;
        Ok(PosMarker {
            value,
            pos: Cell::new(pos),
        })
    }
}

impl<T: BinWrite<Args<'static> = ()>> BinWrite for PosMarker<T> {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<()> {
        self.pos.set(writer.stream_position()?);
        T::write_options(&self.value, writer, endian, ())
    }
}

fn patch<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    at: u64,
    value: impl BinWrite<Args<'static> = ()>,
) -> BinResult<()> {
    let back = writer.stream_position()?;
    writer.seek(SeekFrom::Start(at))?;
    value.write_options(writer, endian, ())?;
    writer.seek(SeekFrom::Start(back))?;
    Ok(())
}

/// Marker trait for the integer width a [`PosMarker`] offset/size field is encoded as.
pub trait MarkerInt: Copy + BinWrite<Args<'static> = ()> + TryFrom<u64>
where
    <Self as TryFrom<u64>>::Error: std::fmt::Debug,
{
}
impl<T> MarkerInt for T
where
    T: Copy + BinWrite<Args<'static> = ()> + TryFrom<u64>,
    <T as TryFrom<u64>>::Error: std::fmt::Debug,
{
}

impl<Toff: MarkerInt> PosMarker<Toff> {
    /// Writes `this`, then patches this marker with `this`'s absolute stream offset.
    pub fn write_aoff<W: Write + Seek, V: BinWrite<Args<'static> = ()>>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>,),
    ) -> BinResult<()> {
        write_aoff_generic(this, writer, endian, args.0)
    }

    /// Writes `this`, then patches this marker with `this`'s size in bytes.
    pub fn write_size<W: Write + Seek, V: BinWrite<Args<'static> = ()>>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>,),
    ) -> BinResult<()> {
        write_size_generic(this, writer, endian, args.0, 0)
    }

    /// As [`Self::write_size`], adding `plus` extra bytes to the patched size.
    pub fn write_size_plus<W: Write + Seek, V: BinWrite<Args<'static> = ()>>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, u64),
    ) -> BinResult<()> {
        write_size_generic(this, writer, endian, args.0, args.1)
    }

    /// Writes `this`, patching this marker with the absolute offset `this` was written at,
    /// and a sibling marker with `this`'s size in bytes.
    pub fn write_aoff_size<W: Write + Seek, V: BinWrite<Args<'static> = ()>, Tsize: MarkerInt>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Tsize>),
    ) -> BinResult<()> {
        write_aoff_size_generic(this, (), writer, endian, args.0, args.1)
    }

    /// As [`Self::write_aoff_size`], for a value whose [`BinWrite`] needs non-unit args.
    pub fn write_aoff_size_a<
        W: Write + Seek,
        V: BinWrite<Args<'static> = A>,
        Tsize: MarkerInt,
        A: 'static,
    >(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Tsize>, A),
    ) -> BinResult<()> {
        write_aoff_size_generic(this, args.2, writer, endian, args.0, args.1)
    }

    /// Same shape as [`Self::write_aoff_size`]: some messages store this offset as an
    /// absolute position (like `write_aoff_size`) while calling it a "relative offset" in
    /// MS-SMB2 because it's measured from the header rather than the field itself.
    pub fn write_roff_size<W: Write + Seek, V: BinWrite<Args<'static> = ()>, Tsize: MarkerInt>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Tsize>),
    ) -> BinResult<()> {
        write_aoff_size_generic(this, (), writer, endian, args.0, args.1)
    }

    /// Writes `this`, then patches this marker with `this`'s offset relative to `base`.
    pub fn write_roff_b<W: Write + Seek, V: BinWrite<Args<'static> = ()>, Base>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Base>),
    ) -> BinResult<()> {
        write_roff_b_plus_generic(this, writer, endian, args.0, args.1, 0)
    }

    /// As [`Self::write_roff_b`], adding `plus` to the patched relative offset.
    pub fn write_roff_b_plus<W: Write + Seek, V: BinWrite<Args<'static> = ()>, Base>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Base>, u64),
    ) -> BinResult<()> {
        write_roff_b_plus_generic(this, writer, endian, args.0, args.1, args.2)
    }

    /// Writes `this`, then patches this marker with its own offset relative to itself, plus
    /// `plus` - for self-referential chained-item layouts where the offset field's own
    /// position serves as the base.
    pub fn write_roff_plus<W: Write + Seek, V: BinWrite<Args<'static> = ()>>(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, u64),
    ) -> BinResult<()> {
        write_roff_b_plus_generic(this, writer, endian, args.0, args.0, args.1)
    }

    /// Combines [`Self::write_roff_b_plus`] (offset relative to `base`, plus `plus`) with a
    /// sibling size marker, as [`Self::write_aoff_size`] does for absolute offsets.
    pub fn write_roff_size_b_plus<
        W: Write + Seek,
        V: BinWrite<Args<'static> = ()>,
        Tsize: MarkerInt,
        Base,
    >(
        this: &V,
        writer: &mut W,
        endian: Endian,
        args: (&PosMarker<Toff>, &PosMarker<Tsize>, &PosMarker<Base>, u64),
    ) -> BinResult<()> {
        let (offset_marker, size_marker, base, plus) = args;
        let start = writer.stream_position()?;
        this.write_options(writer, endian, ())?;
        let end = writer.stream_position()?;
        let rel = (start - base.pos()) + plus;
        let off: Toff = rel.try_into().expect("offset exceeds field width");
        patch(writer, endian, offset_marker.pos(), off)?;
        let size: Tsize = (end - start).try_into().expect("size exceeds field width");
        patch(writer, endian, size_marker.pos(), size)
    }
}

fn write_aoff_generic<W: Write + Seek, Toff: MarkerInt, V: BinWrite<Args<'static> = ()>>(
    this: &V,
    writer: &mut W,
    endian: Endian,
    marker: &PosMarker<Toff>,
) -> BinResult<()> {
    let data_pos = writer.stream_position()?;
    let off: Toff = data_pos.try_into().expect("offset exceeds field width");
    patch(writer, endian, marker.pos(), off)?;
    this.write_options(writer, endian, ())
}

fn write_size_generic<W: Write + Seek, Toff: MarkerInt, V: BinWrite<Args<'static> = ()>>(
    this: &V,
    writer: &mut W,
    endian: Endian,
    marker: &PosMarker<Toff>,
    plus: u64,
) -> BinResult<()> {
    let start = writer.stream_position()?;
    this.write_options(writer, endian, ())?;
    let end = writer.stream_position()?;
    let size: Toff = (end - start + plus)
        .try_into()
        .expect("size exceeds field width");
    patch(writer, endian, marker.pos(), size)
}

fn write_aoff_size_generic<
    W: Write + Seek,
    Toff: MarkerInt,
    Tsize: MarkerInt,
    V: BinWrite<Args<'static> = A>,
    A: 'static,
>(
    this: &V,
    this_args: A,
    writer: &mut W,
    endian: Endian,
    offset_marker: &PosMarker<Toff>,
    size_marker: &PosMarker<Tsize>,
) -> BinResult<()> {
    let start = writer.stream_position()?;
    let off: Toff = start.try_into().expect("offset exceeds field width");
    patch(writer, endian, offset_marker.pos(), off)?;
    this.write_options(writer, endian, this_args)?;
    let end = writer.stream_position()?;
    let size: Tsize = (end - start).try_into().expect("size exceeds field width");
    patch(writer, endian, size_marker.pos(), size)
}

fn write_roff_b_plus_generic<
    W: Write + Seek,
    Toff: MarkerInt,
    Base,
    V: BinWrite<Args<'static> = ()>,
>(
    this: &V,
    writer: &mut W,
    endian: Endian,
    offset_marker: &PosMarker<Toff>,
    base: &PosMarker<Base>,
    plus: u64,
) -> BinResult<()> {
    let data_pos = writer.stream_position()?;
    let rel = (data_pos - base.pos()) + plus;
    let off: Toff = rel.try_into().expect("offset exceeds field width");
    patch(writer, endian, offset_marker.pos(), off)?;
    this.write_options(writer, endian, ())
}
