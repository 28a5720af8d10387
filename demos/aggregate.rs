use bitfield_rs::{
    Bitlist, Bitlist64, BitfieldRead, BitlistRef, BitwiseOps, Encodable, testutil::BitGen,
};

fn main() {
    const COMMITTEE_SIZE: usize = 512;
    let mut bitgen = BitGen::new(0xDEAD_BEEF);

    // simulate 64 attestations, each signed by a handful of committee members,
    // as they would arrive from the network
    let attestations: Vec<_> = (0..64)
        .map(|_| bitgen.bitlist(COMMITTEE_SIZE, 12).encode_to_bytes())
        .collect();

    // fold every attestation into a single accumulator, reusing two buffers
    // for the whole loop
    let mut acc = Bitlist64::new(COMMITTEE_SIZE);
    let mut scratch = Bitlist64::new(COMMITTEE_SIZE);
    for encoded in &attestations {
        // decoding rejects malformed input instead of panicking
        let view = BitlistRef::from_bytes(encoded.clone()).unwrap();
        let vote = view.to_bitlist().to_bitlist64();
        acc.or_into(&vote, &mut scratch).unwrap();
        std::mem::swap(&mut acc, &mut scratch);
    }

    println!(
        "{} of {} committee members participated",
        acc.count(),
        acc.len()
    );

    // a second aggregate only needs to know how many new signers it would add
    let other = bitgen.bitlist64(COMMITTEE_SIZE, 100);
    let combined = acc.or_count(&other).unwrap();
    println!("merging another aggregate would cover {combined} members");

    // convert back to the wire form
    let wire = Bitlist::from(&acc);
    let bytes = wire.encode_to_bytes();
    println!("Encoded aggregate size: {} bytes", bytes.len());
    for byte in bytes.iter().take(16) {
        print!("{byte:02X} ");
    }
    println!();

    assert_eq!(Bitlist::from_bytes(&bytes).unwrap(), acc);
    println!("Success!");
}
