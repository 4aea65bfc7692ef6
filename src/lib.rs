///
/// ## Design
///
/// * fixed 8-bit instruction set (the classic 35-entry table), decoded by a
///   pure mapping into an `Operation` enum; the interpreter matches on the
///   result, so there is no dynamic dispatch in the hot loop
/// * a single owned state block (memory, registers, display, keypad, stack,
///   timers); handlers take `&mut self` and keep nothing across calls
/// * host drives everything: call `tick()` at 60Hz, update the keypad
///   before it, read the display after it, never overlapping
/// * quirk toggles (`Settings`) reproduce the historically divergent
///   shift / vf-reset / jump-offset / bulk-transfer behaviors roms rely on
/// * abstract display and input behind traits so a variety of front ends
///   plug in; the bundled one is a TUI in-console renderer with crossterm
///   key events
/// * randomness is injected (`with_rng`) so the random instruction is
///   testable with a fixed seed
/// * malformed instruction words are a loud `UnknownOpcode` error, never a
///   silent no-op; stack overflow/underflow likewise
///
/// Model
///
/// host binary
///  |-- display (trait), input (trait), settings from CLI flags
///  |-- interpreter
///  |    |-- memory map (font + program regions)
///  |    |-- opcode view -> decode -> execute
///  |    `-- framebuffer, keypad, stack, timers
///  `-- main loop at 60Hz
///       |-- forward buffered key presses
///       |-- interpreter.tick()
///       `-- display.draw(interpreter.display())
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod opcode;
