use argh::FromArgs;

use fixconv::image::{Raster, RasterDtype, RasterSize};
use fixconv::imgproc::filter::{self, kernels, FixedPointScale};

#[derive(FromArgs)]
/// Filter a synthetic raster with a fixed-point kernel and print the result
struct Args {
    /// filter to apply: identity, box, binomial, sobel-x or sobel-y
    #[argh(option, short = 'f', default = "String::from(\"binomial\")")]
    filter: String,

    /// kernel size, a power of two for the box filter
    #[argh(option, short = 'k', default = "3")]
    size: usize,

    /// raster width
    #[argh(option, default = "12")]
    width: usize,

    /// raster height
    #[argh(option, default = "8")]
    height: usize,

    /// right shift applied by the identity filter
    #[argh(option, default = "0")]
    rshift: u32,

    /// offset added by the identity filter
    #[argh(option, default = "0")]
    offset: i64,
}

/// A bright square on a horizontal ramp.
fn synthetic<T: RasterDtype + From<u8>>(
    size: RasterSize,
) -> Result<Raster<T>, Box<dyn std::error::Error>> {
    let mut raster = Raster::<T>::from_size_val(size, 1, T::default())?;
    for y in 0..size.height {
        for x in 0..size.width {
            let ramp = (x * 8).min(127) as u8;
            let square = x >= size.width / 4
                && x < 3 * size.width / 4
                && y >= size.height / 4
                && y < 3 * size.height / 4;
            let value = if square { 200 } else { ramp };
            raster.set(<T as From<u8>>::from(value), x, y, 0)?;
        }
    }
    Ok(raster)
}

fn print_raster<T: RasterDtype>(name: &str, raster: &Raster<T>) {
    println!("{name}:");
    for y in 0..raster.height() {
        let row = raster
            .line(y, 0)
            .iter()
            .map(|v| format!("{v:?}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {row}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = RasterSize {
        width: args.width,
        height: args.height,
    };
    log::info!("filter {} size {} on a {} raster", args.filter, args.size, size);

    match args.filter.as_str() {
        "identity" => {
            let src = synthetic::<u8>(size)?;
            let mut dst = Raster::<u8>::like(&src);
            let scale = FixedPointScale::new(args.rshift, args.offset);
            filter::convolve(&src, &mut dst, &kernels::identity_kernel()?, scale)?;
            print_raster("src", &src);
            print_raster("dst", &dst);
        }
        "box" => {
            // keep the horizontal sums inside u16
            let src = synthetic::<u16>(size)?;
            let mut dst = Raster::<u16>::like(&src);
            filter::box_blur(&src, &mut dst, (args.size, args.size))?;
            print_raster("src", &src);
            print_raster("dst", &dst);
        }
        "binomial" => {
            let src = synthetic::<u16>(size)?;
            let mut dst = Raster::<u16>::like(&src);
            filter::binomial_blur(&src, &mut dst, (args.size, args.size))?;
            print_raster("src", &src);
            print_raster("dst", &dst);
        }
        "sobel-x" | "sobel-y" => {
            let src = synthetic::<i16>(size)?;
            let mut dst = Raster::<i16>::like(&src);
            if args.filter == "sobel-x" {
                filter::sobel_x(&src, &mut dst, args.size)?;
            } else {
                filter::sobel_y(&src, &mut dst, args.size)?;
            }
            print_raster("src", &src);
            print_raster("dst", &dst);
        }
        other => {
            log::error!("unknown filter: {other}");
            return Err(format!("unknown filter: {other}").into());
        }
    }

    Ok(())
}
