//! `.eh_frame` adapter
//!
//! Forwards one `begin_cfi_entry`/`add_cfi_rule`*/`end_cfi_entry`
//! sequence per frame-description entry. Register-recovery state is
//! emitted as deltas: the first unwind row carries its full rule set,
//! later rows only what changed, so rule addresses never decrease within
//! an entry. The canonical-frame-address computation is forwarded against
//! the distinguished [`CfiRegister::Cfa`] target.

use std::collections::HashMap;

use gimli::{
    BaseAddresses, CfaRule, CieOrFde, CommonInformationEntry, EhFrame, EndianSlice, RegisterRule,
    RunTimeEndian, UnwindContext, UnwindSection,
};
use tracing::{trace, warn};

use crate::core::{section_names, CfiEntryInfo, CfiRegister, CfiRule, Result};
use crate::elf::SectionMap;
use crate::visit::DwarfVisitor;

type Slice<'data> = EndianSlice<'data, RunTimeEndian>;

pub(crate) struct FrameParser<'data> {
    eh_frame: EhFrame<Slice<'data>>,
    bases: BaseAddresses,
}

impl<'data> FrameParser<'data> {
    /// `None` when the image has no `.eh_frame`.
    pub(crate) fn new(sections: &SectionMap<'data>) -> Option<FrameParser<'data>> {
        let data = sections.section(section_names::EH_FRAME);
        if data.is_empty() {
            return None;
        }
        let mut eh_frame = EhFrame::new(data, sections.endian());
        eh_frame.set_address_size(sections.address_size());
        // PC-relative pointer encodings resolve against the section's own
        // load address and the text base.
        let bases = BaseAddresses::default()
            .set_eh_frame(sections.load_address(section_names::EH_FRAME))
            .set_text(sections.load_address(section_names::TEXT));
        Some(FrameParser { eh_frame, bases })
    }

    pub(crate) fn parse<V: DwarfVisitor>(&self, visitor: &mut V) -> Result<()> {
        let mut entries = self.eh_frame.entries(&self.bases);
        loop {
            match entries.next()? {
                None => return Ok(()),
                Some(CieOrFde::Cie(_)) => {}
                Some(CieOrFde::Fde(partial)) => {
                    let fde = match partial
                        .parse(|_, bases, offset| self.eh_frame.cie_from_offset(bases, offset))
                    {
                        Ok(fde) => fde,
                        Err(error) => {
                            warn!(%error, "skipping unparsable FDE");
                            continue;
                        }
                    };
                    if let Err(error) = self.forward_fde(&fde, visitor) {
                        warn!(%error, offset = fde.offset(), "skipping FDE with bad unwind program");
                    }
                }
            }
        }
    }

    fn forward_fde<V: DwarfVisitor>(
        &self,
        fde: &gimli::FrameDescriptionEntry<Slice<'data>>,
        visitor: &mut V,
    ) -> Result<()> {
        let cie = fde.cie();
        let entry = CfiEntryInfo {
            offset: fde.offset() as u64,
            address: fde.initial_address(),
            length: fde.len(),
            version: cie.version(),
            augmentation: augmentation_string(cie),
            return_address_register: cie.return_address_register().0 as u64,
        };
        if !visitor.begin_cfi_entry(&entry) {
            return Ok(());
        }

        let mut context = UnwindContext::new();
        let mut table = fde.rows(&self.eh_frame, &self.bases, &mut context)?;
        let mut previous_cfa: Option<CfaRule<usize>> = None;
        let mut previous_rules: HashMap<u16, RegisterRule<usize>> = HashMap::new();

        while let Some(row) = table.next_row()? {
            let address = row.start_address();
            if previous_cfa.as_ref() != Some(row.cfa()) {
                let rule = self.convert_cfa(row.cfa())?;
                if !visitor.add_cfi_rule(address, CfiRegister::Cfa, &rule) {
                    return Ok(());
                }
                previous_cfa = Some(row.cfa().clone());
            }
            for (register, rule) in row.registers() {
                if previous_rules.get(&register.0) == Some(rule) {
                    continue;
                }
                if let Some(converted) = self.convert_rule(rule)? {
                    if !visitor.add_cfi_rule(address, CfiRegister::Reg(register.0), &converted) {
                        return Ok(());
                    }
                }
                previous_rules.insert(register.0, rule.clone());
            }
        }

        visitor.end_cfi_entry();
        Ok(())
    }

    fn convert_cfa(&self, cfa: &CfaRule<usize>) -> Result<CfiRule<'data>> {
        Ok(match cfa {
            CfaRule::RegisterAndOffset { register, offset } => CfiRule::ValOffset {
                base: CfiRegister::Reg(register.0),
                offset: *offset,
            },
            CfaRule::Expression(expression) => {
                CfiRule::ValExpression(expression.get(&self.eh_frame)?.0.slice())
            }
        })
    }

    fn convert_rule(&self, rule: &RegisterRule<usize>) -> Result<Option<CfiRule<'data>>> {
        Ok(Some(match rule {
            RegisterRule::Undefined => CfiRule::Undefined,
            RegisterRule::SameValue => CfiRule::SameValue,
            RegisterRule::Offset(offset) => CfiRule::Offset {
                base: CfiRegister::Cfa,
                offset: *offset,
            },
            RegisterRule::ValOffset(offset) => CfiRule::ValOffset {
                base: CfiRegister::Cfa,
                offset: *offset,
            },
            RegisterRule::Register(register) => CfiRule::Register(register.0),
            RegisterRule::Expression(expression) => {
                CfiRule::Expression(expression.get(&self.eh_frame)?.0.slice())
            }
            RegisterRule::ValExpression(expression) => {
                CfiRule::ValExpression(expression.get(&self.eh_frame)?.0.slice())
            }
            other => {
                trace!(?other, "call-frame rule kind not forwarded");
                return Ok(None);
            }
        }))
    }
}

// The decoder does not keep the raw augmentation bytes; rebuild the
// letters from what it decoded.
fn augmentation_string(cie: &CommonInformationEntry<Slice<'_>>) -> String {
    let lsda = cie.lsda_encoding().is_some();
    let personality = cie.personality_with_encoding().is_some();
    let fde_encoding = cie.fde_address_encoding().is_some();
    let mut augmentation = String::new();
    if lsda || personality || fde_encoding {
        augmentation.push('z');
    }
    if lsda {
        augmentation.push('L');
    }
    if personality {
        augmentation.push('P');
    }
    if fde_encoding {
        augmentation.push('R');
    }
    augmentation
}
