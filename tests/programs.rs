mod common;

use chip8::{Chip8, Chip8Error, PIXEL_ON, PROGRAM_START, VIDEO_WIDTH};
use common::{machine, rom, run};

fn lit(chip8: &Chip8) -> usize {
    chip8
        .framebuffer()
        .iter()
        .filter(|&&p| p == PIXEL_ON)
        .count()
}

#[test]
fn counts_down_in_a_loop() {
    // V0 = 10; loop: V0 -= 1 (via V1 = 1, 8015); skip out when V0 == 0
    let program = [
        0x600A, // 200: V0 = 10
        0x6101, // 202: V1 = 1
        0x8015, // 204: V0 -= V1
        0x3000, // 206: skip if V0 == 0
        0x1204, // 208: jump 204
        0x120A, // 20A: halt
    ];
    let mut chip8 = machine(&program, &[]);
    run(&mut chip8, 2 + 10 * 3);
    assert_eq!(chip8.register(0), 0);
    assert_eq!(chip8.pc(), 0x20A);
    run(&mut chip8, 5);
    assert_eq!(chip8.pc(), 0x20A);
}

#[test]
fn prints_a_number_with_the_font() {
    // BCD of 137 at 0x300, then draw each digit from the font
    let program = [
        0x6A89, // V A = 137
        0xA300, // I = 0x300
        0xFA33, // BCD
        0xF265, // V0..V2 = digits
        0x6B00, // x
        0x6C00, // y
        0xF029, // I = glyph V0
        0xDBC5,
        0x7B05,
        0xF129, // I = glyph V1
        0xDBC5,
        0x7B05,
        0xF229, // I = glyph V2
        0xDBC5,
    ];
    let mut chip8 = machine(&program, &[]);
    run(&mut chip8, program.len());

    assert_eq!(chip8.memory()[0x300..0x303], [1, 3, 7]);
    assert_eq!(chip8.register(0xF), 0);
    // "1" is 0x20 0x60 0x20 0x20 0x70, so its stem is at column 2
    for y in 0..5 {
        assert!(chip8.pixel(2, y));
    }
    // "7" starts at column 10 with a full top bar
    for x in 10..14 {
        assert!(chip8.pixel(x, 0));
    }
    // lit pixels per glyph: "1" has 8, "3" has 14, "7" has 8
    assert_eq!(lit(&chip8), 8 + 14 + 8);
}

#[test]
fn nested_subroutines_unwind() {
    let outer: &[u8] = &[0x23, 0x10, 0x00, 0xEE]; // call 310, return
    let inner: &[u8] = &[0x6B, 0x02, 0x00, 0xEE]; // VB = 2, return
    let mut chip8 = machine(&[0x2300, 0x6A01], &[(0x300, outer), (0x310, inner)]);
    run(&mut chip8, 2);
    assert_eq!(chip8.stack_depth(), 2);
    assert_eq!(chip8.pc(), 0x310);
    run(&mut chip8, 3);
    assert_eq!(chip8.register(0xB), 2);
    assert_eq!(chip8.stack_depth(), 0);
    assert_eq!(chip8.pc(), 0x202);
    run(&mut chip8, 1);
    assert_eq!(chip8.register(0xA), 1);
}

#[test]
fn waits_for_a_key_then_reads_it() {
    let mut chip8 = machine(&[0xF50A, 0xE59E, 0x1204, 0x6001], &[]);
    run(&mut chip8, 3);
    assert_eq!(chip8.pc(), PROGRAM_START);

    chip8.set_key(0x9, true);
    run(&mut chip8, 2);
    assert_eq!(chip8.register(5), 0x9);
    // key still held, so the skip happens
    assert_eq!(chip8.pc(), 0x206);
}

#[test]
fn sprite_from_program_data_collides() {
    let sprite: &[u8] = &[0b1100_0011, 0b0011_1100];
    let mut chip8 = machine(
        &[0xA300, 0x6000, 0x6100, 0xD012, 0x7001, 0xD012],
        &[(0x300, sprite)],
    );
    run(&mut chip8, 4);
    assert_eq!(chip8.register(0xF), 0);
    assert_eq!(lit(&chip8), 8);

    // the same sprite one pixel to the right overlaps in five places
    run(&mut chip8, 2);
    assert_eq!(chip8.register(0xF), 1);
    assert!(chip8.pixel(0, 0));
    assert!(!chip8.pixel(1, 0));
    assert!(chip8.pixel(2, 0));
    assert!(!chip8.pixel(7, 0));
    assert!(chip8.pixel(8, 0));
    assert_eq!(chip8.framebuffer()[VIDEO_WIDTH + 2], PIXEL_ON);
    assert!(!chip8.pixel(4, 1));
    assert_eq!(lit(&chip8), 6);
}

#[test]
fn runaway_recursion_is_reported() {
    let body: &[u8] = &[0x22, 0x02];
    let mut chip8 = machine(&[0x2202], &[(0x202, body)]);
    let err = (0..32).find_map(|_| chip8.step().err());
    match err {
        Some(Chip8Error::StackOverflow { pc }) => assert_eq!(pc, 0x202),
        other => panic!("expected a stack overflow, got {:?}", other),
    }
}

#[test]
fn oversized_rom_is_rejected() {
    let mut chip8 = Chip8::with_seed(1);
    let image = vec![0x12; 4096 - 0x200 + 1];
    assert!(matches!(
        chip8.load(&image),
        Err(Chip8Error::RomTooLarge { .. })
    ));
    assert_eq!(chip8.memory()[0x200], 0);
}

#[test]
fn loads_rom_from_disk() {
    let path = std::env::temp_dir().join(format!("chip8-test-{}.ch8", std::process::id()));
    std::fs::write(&path, rom(&[0x6A2A], &[])).unwrap();

    let mut chip8 = Chip8::with_seed(1);
    chip8.load_rom(&path).unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.register(0xA), 0x2A);

    std::fs::remove_file(&path).unwrap();
}
