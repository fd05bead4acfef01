use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitInt};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The generated guard reports on drop, so early returns are covered too.
/// Runs faster than the threshold are reported at `debug!`, slower ones at
/// `info!`, tagged with the name of the thread that ran them (the navigator
/// names its search and state threads).
///
/// Without `perf_stats` the function is emitted untouched.
///
/// # Example
/// ```ignore
/// #[profile]
/// fn expand(&mut self) { /* ... */ }
///
/// #[profile(10)] // threshold in milliseconds, default 1
/// pub fn find_tile_path(/* ... */) -> Option<Vec<TileCoord>> { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        match lit.base10_parse::<u128>() {
            Ok(value) => value,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        let thread = std::thread::current();
                        let thread_name = thread.name().unwrap_or("unnamed");
                        if elapsed.as_millis() > #threshold_ms {
                            bevy::prelude::info!("[PERF] {} on {}: {:?}", self.name, thread_name, elapsed);
                        } else {
                            bevy::prelude::debug!("[PERF] {} on {}: {:?}", self.name, thread_name, elapsed);
                        }
                    }
                }
                ProfileGuard {
                    name: #fn_name_str,
                    start: std::time::Instant::now(),
                }
            };

            #block
        }
    };

    output.into()
}
