//! Hashcat modes treated as slow algorithms.
//!
//! For these modes candidate generation is cheap compared to hashing, so
//! hashcat brain deduplication pays off and new hashlists get `useBrain`.

/// Sorted hashcat mode numbers.
pub const SLOW_ALGORITHMS: &[u32] = &[
    400,   // phpass
    500,   // md5crypt
    1800,  // sha512crypt
    2100,  // Domain Cached Credentials 2
    2500,  // WPA-EAPOL-PBKDF2
    3200,  // bcrypt
    5200,  // Password Safe v3
    6211,  // TrueCrypt RIPEMD160 + XTS 512
    6212,  // TrueCrypt RIPEMD160 + XTS 1024
    6213,  // TrueCrypt RIPEMD160 + XTS 1536
    6221,  // TrueCrypt SHA512 + XTS 512
    6231,  // TrueCrypt Whirlpool + XTS 512
    6241,  // TrueCrypt RIPEMD160 + XTS 512 boot
    6242,  // TrueCrypt RIPEMD160 + XTS 1024 boot
    6243,  // TrueCrypt RIPEMD160 + XTS 1536 boot
    6800,  // LastPass
    7100,  // macOS v10.8+ PBKDF2-SHA512
    7400,  // sha256crypt
    8200,  // 1Password cloudkeychain
    8800,  // Android FDE <= 4.3
    9000,  // Password Safe v2
    9100,  // Lotus Notes/Domino 8
    9200,  // Cisco-IOS $8$
    9300,  // Cisco-IOS $9$
    9400,  // MS Office 2007
    9500,  // MS Office 2010
    9600,  // MS Office 2013
    10000, // Django PBKDF2-SHA256
    10900, // PBKDF2-HMAC-SHA256
    11300, // Bitcoin/Litecoin wallet.dat
    11600, // 7-Zip
    12001, // Atlassian PBKDF2-HMAC-SHA1
    12100, // PBKDF2-HMAC-SHA512
    12500, // RAR3-hp
    13000, // RAR5
    13400, // KeePass
    13600, // WinZip
    15300, // DPAPI masterkey v1
    15700, // Ethereum Wallet, SCRYPT
    16300, // Ethereum Pre-Sale Wallet
    16800, // WPA-PMKID-PBKDF2
    19600, // Kerberos 5 etype 17 TGS-REP
    19700, // Kerberos 5 etype 18 TGS-REP
    22000, // WPA-PBKDF2-PMKID+EAPOL
    22001, // WPA-PMK-PMKID+EAPOL
];

/// Whether `mode` is a slow hashcat algorithm
pub fn is_slow(mode: u32) -> bool {
    SLOW_ALGORITHMS.binary_search(&mode).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(SLOW_ALGORITHMS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn bcrypt_is_slow() {
        assert!(is_slow(3200));
        assert!(is_slow(22000));
    }

    #[test]
    fn fast_hashes_are_not_slow() {
        assert!(!is_slow(0)); // MD5
        assert!(!is_slow(1000)); // NTLM
        assert!(!is_slow(100)); // SHA1
    }
}
