use synchronized::synchronized;

synchronized! {
    pub struct Every {
        #[locked(Checked)]
        pub let mut a: u8 = 0;
        #[locked(Unchecked)]
        pub let mut b: u8;
        #[locked(CheckedOptional)]
        pub let mut c: Option<u8> = None;
        #[locked(UncheckedOptional)]
        pub let mut d: Option<u8>;
    }
}

fn main() {
    let every = Every::new(1, Some(2));
    every.set_a(every.a() + every.b());
    every.set_c(every.d());
    let _: Result<Option<u8>, synchronized::LockedError> = every.try_c();
    let _: Result<(), synchronized::LockedError> = every.try_set_d(None);
}
