#![no_main]

use libfuzzer_sys::{fuzz_target, Corpus};

const SIGNATURES: &[&str] = &[
    "s",
    "v",
    "a{sv}",
    "(sia{sv})",
    "aas",
    "m(yui)",
    "a(tsv)",
    "((v)v)",
];

fuzz_target!(|data: &[u8]| -> Corpus {
    let mut keep = false;

    for signature in SIGNATURES {
        // decode must be total for arbitrary input
        let value = gvariant_codec::parse(signature, data).unwrap();

        // decoded values live in the signature's domain: they re-encode
        // cleanly and the re-encoding is a fixpoint
        let bytes = gvariant_codec::serialize(signature, &value).unwrap();
        let again = gvariant_codec::parse(signature, &bytes).unwrap();
        assert_eq!(
            bytes,
            gvariant_codec::serialize(signature, &again).unwrap()
        );

        keep |= !bytes.is_empty();
    }

    if keep {
        Corpus::Keep
    } else {
        Corpus::Reject
    }
});
